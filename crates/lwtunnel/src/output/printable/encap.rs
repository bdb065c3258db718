//! Printable implementation for decoded encapsulations.

use std::io::Write;

use serde::Serialize;

use crate::netlink::lwtunnel::{EncapDisplay, EncapPayload};
use crate::output::{OutputOptions, Printable};
use crate::util::addr::AddrCodec;

impl<C: AddrCodec + ?Sized> Printable for EncapDisplay<'_, C> {
    fn print_text<W: Write>(&self, w: &mut W, opts: &OutputOptions) -> std::io::Result<()> {
        write!(w, "{}", self)?;
        let info = self.info();
        if opts.details && info.payload == EncapPayload::Opaque {
            write!(w, " type {}", info.encap_type.tag())?;
        }
        Ok(())
    }

    fn to_json(&self) -> serde_json::Value {
        let info = self.info();
        let json = EncapJson {
            encap: info.encap_type.format(),
            kind: (info.payload == EncapPayload::Opaque).then(|| info.encap_type.tag()),
            dst: self.dst(),
        };
        serde_json::to_value(json).unwrap_or(serde_json::Value::Null)
    }
}

/// JSON shape of an encapsulation.
#[derive(Serialize)]
struct EncapJson {
    encap: &'static str,
    /// Raw tag, only for types without a decoder.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    kind: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dst: Option<String>,
}
