//
//  gerrit-cli
//  output/json.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Indented JSON rendering for verbose output.

use std::io::Write;

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

/// Serializes `value` as JSON indented with tabs.
///
/// Field order follows the struct (or, for raw JSON values, the server's
/// order).
pub fn to_indent_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<String> {
    let mut buf = Vec::new();
    write_indent_json(&mut buf, value)?;
    Ok(String::from_utf8(buf)?)
}

/// Writes `value` as tab-indented JSON to `writer`, without a trailing
/// newline.
pub fn write_indent_json<W: Write, T: Serialize + ?Sized>(
    writer: &mut W,
    value: &T,
) -> anyhow::Result<()> {
    let mut ser = Serializer::with_formatter(writer, PrettyFormatter::with_indent(b"\t"));
    value.serialize(&mut ser)?;
    Ok(())
}
