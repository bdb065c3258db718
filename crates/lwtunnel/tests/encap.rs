//! End-to-end tests for encoding and printing encapsulations.
//!
//! These tests only build byte buffers; no socket or privileges needed.

use lwtunnel::netlink::attr::{NLA_F_NESTED, NLA_HDRLEN};
use lwtunnel::netlink::lwtunnel::{EncapAttrIds, EncapInfo, EncapType, parse_encap, print_encap};
use lwtunnel::netlink::message::NLM_F_REQUEST;
use lwtunnel::netlink::multipath::{MultipathBuilder, NexthopIter};
use lwtunnel::netlink::types::nexthop::NhMsg;
use lwtunnel::netlink::types::route::{RtMsg, RtaAttr};
use lwtunnel::netlink::{AttrSink, AttrTable, MessageBuilder, NLMSG_HDRLEN, NlMsgType, ParseError};
use lwtunnel::util::addr::{AddrCodec, AddrError, AddrFamily, EncodedAddr, StdAddrCodec};
use lwtunnel::util::args::TokenCursor;

/// Accepts only "10.0.0.1", encoded as its four octets.
struct StubCodec;

impl AddrCodec for StubCodec {
    fn parse(&self, text: &str, family: AddrFamily) -> Result<EncodedAddr, AddrError> {
        if text == "10.0.0.1" {
            Ok(EncodedAddr::new(family, vec![10, 0, 0, 1]))
        } else {
            Err(AddrError::InvalidAddress(text.to_string()))
        }
    }

    fn format(&self, _family: AddrFamily, bytes: &[u8]) -> String {
        bytes
            .iter()
            .map(u8::to_string)
            .collect::<Vec<_>>()
            .join(".")
    }
}

fn read_u16(buf: &[u8], offset: usize) -> u16 {
    u16::from_ne_bytes([buf[offset], buf[offset + 1]])
}

fn route_request() -> MessageBuilder {
    let mut builder = MessageBuilder::new(NlMsgType::RTM_NEWROUTE, NLM_F_REQUEST);
    builder
        .append_struct(&RtMsg::new().with_family(libc::AF_INET as u8))
        .unwrap();
    builder
}

fn route_attrs(msg: &[u8]) -> AttrTable<'_> {
    AttrTable::parse(&msg[NLMSG_HDRLEN + RtMsg::SIZE..])
}

mod parse {
    use super::*;

    #[test]
    fn test_mpls_with_stub_codec() {
        let args = ["mpls", "10.0.0.1"];
        let mut cursor = TokenCursor::new(&args);
        let mut builder = route_request();
        parse_encap(&mut builder, &mut cursor, &StubCodec).unwrap();
        assert_eq!(cursor.position(), 2);
        assert!(cursor.is_empty());

        let msg = builder.finish().unwrap();
        let start = NLMSG_HDRLEN + RtMsg::SIZE;
        assert_eq!(read_u16(&msg, start + 2), RtaAttr::EncapType as u16);
        assert_eq!(read_u16(&msg, start + 4), 1);

        let nest = start + 8;
        assert_eq!(read_u16(&msg, nest), 4 + 4 + 4);
        assert_eq!(read_u16(&msg, nest + 2), RtaAttr::Encap as u16 | NLA_F_NESTED);
        assert_eq!(msg.len(), nest + 12);
    }

    #[test]
    fn test_leaves_following_arguments() {
        let args = ["mpls", "100", "dev", "eth0"];
        let mut cursor = TokenCursor::new(&args);
        let mut builder = route_request();
        parse_encap(&mut builder, &mut cursor, &StdAddrCodec).unwrap();
        assert_eq!(cursor.peek(), Some("dev"));
        assert_eq!(cursor.rest(), &["dev", "eth0"]);
    }

    #[test]
    fn test_owned_arguments() {
        let args: Vec<String> = "mpls 100/200/300".split(' ').map(String::from).collect();
        let mut cursor = TokenCursor::new(&args);
        let mut builder = route_request();
        parse_encap(&mut builder, &mut cursor, &StdAddrCodec).unwrap();

        let msg = builder.finish().unwrap();
        let info = EncapInfo::from_table(&route_attrs(&msg), EncapAttrIds::ROUTE).unwrap();
        assert_eq!(info.mpls_dst().map(<[u8]>::len), Some(12));
    }

    #[test]
    fn test_bad_input_writes_nothing() {
        let cases: [(&[&str], ParseError, usize); 3] = [
            (&["bogus", "x"], ParseError::InvalidEncapType("bogus".into()), 1),
            (&["mpls"], ParseError::EndOfTokens, 1),
            (&[], ParseError::EndOfTokens, 0),
        ];

        for (args, expected, consumed) in cases {
            let mut cursor = TokenCursor::new(args);
            let mut builder = MessageBuilder::new(NlMsgType::RTM_NEWROUTE, 0);
            let err = parse_encap(&mut builder, &mut cursor, &StubCodec).unwrap_err();
            assert_eq!(err, expected);
            assert!(err.is_bad_input());
            assert_eq!(cursor.position(), consumed);
            assert!(builder.is_empty());
        }
    }

    #[test]
    fn test_invalid_label() {
        let args = ["mpls", "1048576"];
        let mut builder = route_request();
        let err = parse_encap(&mut builder, &mut TokenCursor::new(&args), &StdAddrCodec)
            .unwrap_err();
        assert_eq!(err, ParseError::InvalidAddress("1048576".into()));
        assert_eq!(builder.open_nests(), 0);
    }

    #[test]
    fn test_capacity_poisons_message() {
        let args = ["mpls", "1/2/3/4/5/6/7/8"];
        let mut builder = route_request().with_max_len(48);
        let err = parse_encap(&mut builder, &mut TokenCursor::new(&args), &StdAddrCodec)
            .unwrap_err();
        assert!(err.is_capacity_exceeded());
        assert!(err.is_internal());
        assert!(builder.finish().unwrap_err().is_capacity_exceeded());
    }
}

mod print {
    use super::*;

    #[test]
    fn test_round_trip_with_stub_codec() {
        let args = ["mpls", "10.0.0.1"];
        let mut builder = route_request();
        parse_encap(&mut builder, &mut TokenCursor::new(&args), &StubCodec).unwrap();
        let msg = builder.finish().unwrap();

        let attrs = route_attrs(&msg);
        let text = print_encap(
            attrs.get(RtaAttr::EncapType as u16),
            attrs.get(RtaAttr::Encap as u16),
            &StubCodec,
        );
        assert_eq!(text, " encap mpls 10.0.0.1 ");
    }

    #[test]
    fn test_round_trip_label_stack() {
        let args = ["mpls", "0x10/020/16"];
        let mut builder = route_request();
        parse_encap(&mut builder, &mut TokenCursor::new(&args), &StdAddrCodec).unwrap();
        let msg = builder.finish().unwrap();

        let attrs = route_attrs(&msg);
        let info = EncapInfo::from_table(&attrs, EncapAttrIds::ROUTE).unwrap();
        assert_eq!(info.encap_type, EncapType::Mpls);
        assert_eq!(info.display(&StdAddrCodec).to_string(), " encap mpls 16/16/16 ");
    }

    #[test]
    fn test_unknown_type() {
        let mut builder = route_request();
        builder.append_attr_u16(RtaAttr::EncapType as u16, 5).unwrap();
        let msg = builder.finish().unwrap();

        let attrs = route_attrs(&msg);
        let text = print_encap(
            attrs.get(RtaAttr::EncapType as u16),
            attrs.get(RtaAttr::Encap as u16),
            &StdAddrCodec,
        );
        assert_eq!(text, " encap unknown");
    }

    #[test]
    fn test_total_over_arbitrary_input() {
        let samples: [&[u8]; 6] = [
            &[],
            &[1],
            &[1, 0],
            &[0xff, 0xff, 0xff, 0xff],
            &[8, 0, 1, 0, 0, 6, 0x41],
            &[200, 0, 1, 0, 1, 2, 3, 4, 5, 6],
        ];
        for type_attr in samples {
            for payload in samples {
                let _ = print_encap(Some(type_attr), Some(payload), &StdAddrCodec);
                let _ = print_encap(Some(type_attr), None, &StdAddrCodec);
                let _ = print_encap(None, Some(payload), &StdAddrCodec);
            }
        }
    }
}

mod nexthop {
    use super::*;

    #[test]
    fn test_nexthop_object_message() {
        let args = ["mpls", "300"];
        let mut builder = MessageBuilder::new(NlMsgType::RTM_NEWNEXTHOP, NLM_F_REQUEST);
        builder
            .append_struct(&NhMsg::new(libc::AF_INET as u8))
            .unwrap();
        parse_encap(&mut builder, &mut TokenCursor::new(&args), &StdAddrCodec).unwrap();
        let msg = builder.finish().unwrap();

        let header = NhMsg::from_bytes(&msg[NLMSG_HDRLEN..]).unwrap();
        assert_eq!(header.nh_family, libc::AF_INET as u8);

        let attrs = AttrTable::parse(&msg[NLMSG_HDRLEN + NhMsg::SIZE..]);
        assert_eq!(attrs.get(RtaAttr::EncapType as u16), None);
        let info = EncapInfo::from_table(&attrs, EncapAttrIds::NEXTHOP).unwrap();
        assert_eq!(info.display(&StdAddrCodec).to_string(), " encap mpls 300 ");
    }

    #[test]
    fn test_multipath_route() {
        let codec = StdAddrCodec;
        let mut mp = MultipathBuilder::new();
        for (ifindex, labels) in [(2, "100"), (3, "200/300")] {
            let nh = mp.nexthop_start(ifindex, 0, 1).unwrap();
            mp.gateway(&codec.parse("192.0.2.1", AddrFamily::Inet).unwrap())
                .unwrap();
            mp.encap(&mut TokenCursor::new(&["mpls", labels]), &codec)
                .unwrap();
            mp.nexthop_end(nh).unwrap();
        }

        let mut builder = route_request();
        mp.into_attr(&mut builder).unwrap();
        let msg = builder.finish().unwrap();

        let attrs = route_attrs(&msg);
        let multipath = attrs.get(RtaAttr::Multipath as u16).unwrap();
        let printed: Vec<(i32, String)> = NexthopIter::new(multipath)
            .map(|(nh, attrs)| {
                let text = print_encap(
                    attrs.get(RtaAttr::EncapType as u16),
                    attrs.get(RtaAttr::Encap as u16),
                    &codec,
                );
                (nh.rtnh_ifindex, text)
            })
            .collect();

        assert_eq!(
            printed,
            vec![
                (2, " encap mpls 100 ".to_string()),
                (3, " encap mpls 200/300 ".to_string()),
            ]
        );
    }

    #[test]
    fn test_contexts_agree() {
        let args = ["mpls", "10.0.0.1"];

        let mut msg = MessageBuilder::new(NlMsgType::RTM_NEWROUTE, 0);
        parse_encap(&mut msg, &mut TokenCursor::new(&args), &StubCodec).unwrap();
        let msg = msg.finish().unwrap();

        let mut mp = MultipathBuilder::new();
        let nh = mp.nexthop_start(1, 0, 1).unwrap();
        mp.encap(&mut TokenCursor::new(&args), &StubCodec).unwrap();
        mp.nexthop_end(nh).unwrap();
        let mp = mp.finish().unwrap();

        // Skip the multipath header and the rtnexthop record header.
        assert_eq!(&msg[NLMSG_HDRLEN..], &mp[NLA_HDRLEN + 8..]);
    }
}
