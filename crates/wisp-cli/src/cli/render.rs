//! Text output: raw markup for view-source, tag-stripped text otherwise.

use std::io::{self, Write};
use wisp_core::FetchResult;

pub fn show<W: Write>(result: &FetchResult, out: &mut W) -> io::Result<()> {
    if result.display_as_source {
        writeln!(out, "{}", result.body)
    } else {
        out.write_all(strip_markup(&result.body).as_bytes())
    }
}

/// Drops everything between `<` and `>` and decodes `&lt;` / `&gt;`.
/// Other entities are dropped up to their `;`. A `&` whose name ends at
/// whitespace, markup or end of input is not an entity and is kept as text.
pub fn strip_markup(body: &str) -> String {
    let mut text = String::with_capacity(body.len());
    let mut in_tag = false;
    let mut entity: Option<String> = None;

    for c in body.chars() {
        if let Some(name) = entity.as_mut() {
            if c == ';' {
                if !in_tag {
                    match name.as_str() {
                        "lt" => text.push('<'),
                        "gt" => text.push('>'),
                        _ => {}
                    }
                }
                entity = None;
                continue;
            }
            if !(c.is_whitespace() || matches!(c, '<' | '>' | '&')) {
                name.push(c);
                continue;
            }
            if !in_tag {
                text.push('&');
                text.push_str(name);
            }
            entity = None;
        }

        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            '&' => entity = Some(String::new()),
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }

    if let Some(name) = entity {
        if !in_tag {
            text.push('&');
            text.push_str(&name);
        }
    }
    text
}
