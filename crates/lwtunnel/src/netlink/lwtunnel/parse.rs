//! Encoding `encap <type> <args...>` into attributes.

use tracing::{debug, warn};

use super::{EncapSink, EncapType, ParseError};
use crate::netlink::types::mpls::mpls_tunnel;
use crate::util::addr::{AddrCodec, AddrFamily};
use crate::util::args::TokenCursor;

/// Parse the arguments following `encap` and append the encapsulation to
/// `sink`.
///
/// On success the type tag attribute and the nested payload attribute
/// have been appended, and the cursor sits after the last argument of the
/// type. A missing or unknown type name is rejected before anything is
/// written; the cursor then has moved by at most one token.
///
/// # Example
///
/// ```ignore
/// let args = ["mpls", "100"];
/// let mut cursor = TokenCursor::new(&args);
/// parse_encap(&mut builder, &mut cursor, &StdAddrCodec)?;
/// assert_eq!(cursor.position(), 2);
/// ```
pub fn parse_encap<S, T, C>(
    sink: &mut S,
    cursor: &mut TokenCursor<'_, T>,
    codec: &C,
) -> Result<(), ParseError>
where
    S: EncapSink + ?Sized,
    T: AsRef<str>,
    C: AddrCodec + ?Sized,
{
    let name = cursor.next_arg().ok_or(ParseError::EndOfTokens)?;
    let kind = EncapType::resolve(name);
    if kind == EncapType::None {
        return Err(ParseError::InvalidEncapType(name.to_string()));
    }
    if cursor.remaining() < kind.payload_args() {
        return Err(ParseError::EndOfTokens);
    }

    encode_encap(sink, kind, cursor, codec)
}

/// Append the type tag and the nested payload for `kind`.
///
/// The nest is closed even when the payload fails, so the buffer never
/// holds an unpatched header; the payload error takes precedence.
pub(crate) fn encode_encap<S, T, C>(
    sink: &mut S,
    kind: EncapType,
    cursor: &mut TokenCursor<'_, T>,
    codec: &C,
) -> Result<(), ParseError>
where
    S: EncapSink + ?Sized,
    T: AsRef<str>,
    C: AddrCodec + ?Sized,
{
    let ids = sink.encap_ids();
    sink.append_attr_u16(ids.encap_type, kind.tag())?;
    let nest = sink.nest_start(ids.encap)?;

    let payload = encode_payload(sink, kind, cursor, codec);
    let closed = sink.nest_end(nest);
    payload?;
    closed?;

    debug!(
        encap = %kind,
        type_attr = ids.encap_type,
        encap_attr = ids.encap,
        nest_offset = nest.offset(),
        "appended encapsulation"
    );
    Ok(())
}

fn encode_payload<S, T, C>(
    sink: &mut S,
    kind: EncapType,
    cursor: &mut TokenCursor<'_, T>,
    codec: &C,
) -> Result<(), ParseError>
where
    S: EncapSink + ?Sized,
    T: AsRef<str>,
    C: AddrCodec + ?Sized,
{
    match kind {
        EncapType::Mpls => encode_mpls(sink, cursor, codec),
        other => {
            warn!(encap = %other, tag = other.tag(), "no encoder for encapsulation type");
            Err(ParseError::UnsupportedEncapType(other))
        }
    }
}

/// `mpls <label>[/<label>...]`
fn encode_mpls<S, T, C>(
    sink: &mut S,
    cursor: &mut TokenCursor<'_, T>,
    codec: &C,
) -> Result<(), ParseError>
where
    S: EncapSink + ?Sized,
    T: AsRef<str>,
    C: AddrCodec + ?Sized,
{
    let token = cursor.next_arg().ok_or(ParseError::EndOfTokens)?;
    let addr = codec
        .parse(token, AddrFamily::Mpls)
        .map_err(|_| ParseError::InvalidAddress(token.to_string()))?;
    sink.append_attr(mpls_tunnel::DST, addr.as_bytes())?;
    Ok(())
}
