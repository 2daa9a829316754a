//! Server-rendered form page for the browser front end.

use std::fmt::Write;

use super::{
    choice::*,
    color::*,
    generate::Grid
};

/// Number of color slots offered by the form.
pub const SLOTS: usize = 9;

/// Where the browser script is served from.
pub const SCRIPT_PATH: &str = "/static/script.js";

/// Everything the page shows. Dimension fields are echoed back exactly as
/// submitted.
#[derive(Debug, Clone, Default)]
pub struct PageView<'a> {
    pub width: &'a str,
    pub height: &'a str,
    pub block_px: &'a str,
    /// Comma-separated colors picked for subset randomization.
    pub subset: &'a str,
    pub slots: &'a [Choice],
    pub img_b64: Option<&'a str>,
    pub legend: &'a [LegendEntry],
    pub grid: Option<&'a Grid>,
    pub error: Option<&'a str>,
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn slot_row(out: &mut String, i: usize, slot: Option<&Choice>) {
    let selected = slot.map(|c| c.name.as_str()).unwrap_or("");
    let weight = slot.map(|c| c.weight).unwrap_or(0.);

    let _ = write!(out, r#"<div class="slot-row"><select name="color_{i}" class="slot-select"><option value=""></option>"#);
    for name in Palette.names() {
        let sel = if name == selected { " selected" } else { "" };
        let _ = write!(out, r#"<option value="{name}"{sel}>{name}</option>"#);
    }
    if !selected.is_empty() && !Palette.contains(selected) {
        let name = escape(selected);
        let _ = write!(out, r#"<option value="{name}" selected>{name}</option>"#);
    }
    let _ = write!(out, r#"</select><input class="weight" type="number" min="0" step="any" name="weight_{i}" value="{weight}"><button type="button" class="remove" title="Remove">&times;</button></div>"#);
}

fn legend_list(out: &mut String, legend: &[LegendEntry]) {
    out.push_str(r#"<ul id="legendList" class="legend">"#);
    for entry in legend {
        let _ = write!(
            out,
            r#"<li title="Total Weight: {w}"><span class="swatch" style="background:{css}"></span> {name} <span class="legend-weight">({w})</span></li>"#,
            w = entry.weight,
            css = entry.rgb.to_css(),
            name = escape(&entry.name),
        );
    }
    out.push_str("</ul>");
}

fn grid_table(out: &mut String, grid: &Grid) {
    out.push_str(r#"<details><summary>Block grid</summary><table class="grid">"#);
    for row in grid {
        out.push_str("<tr>");
        for name in row {
            let _ = write!(out, "<td>{}</td>", escape(name));
        }
        out.push_str("</tr>");
    }
    out.push_str("</table></details>");
}

pub fn render(view: &PageView) -> String {
    let mut body = String::new();

    if let Some(err) = view.error {
        let _ = write!(body, r#"<p class="error">{}</p>"#, escape(err));
    }

    let _ = write!(
        body,
        r#"<form method="post" action="/">
<label>Width <input name="width" value="{}"></label>
<label>Height <input name="height" value="{}"></label>
<label>Block px <input name="block_px" value="{}"></label>
<label><input type="checkbox" id="autoWeights"> Auto weights</label>
<input type="hidden" id="subsetInput" name="subset" value="{}">
"#,
        escape(view.width),
        escape(view.height),
        escape(view.block_px),
        escape(view.subset),
    );
    for i in 0 .. SLOTS {
        slot_row(&mut body, i + 1, view.slots.get(i));
    }
    body.push_str(concat!(
        r#"<div class="actions">"#,
        r#"<button id="generateBtn" type="button" title="Hotkey: G">Generate</button>"#,
        r#"<button id="randHotbar" type="button" title="Hotkey: R">Randomize hotbar</button>"#,
        r#"<button id="randSubset" type="button" title="Hotkey: S">Randomize subset</button>"#,
        r#"<button id="clearAll" type="button">Clear all</button>"#,
        r#"<button type="submit">Render page</button>"#,
        "</div></form>",
    ));

    body.push_str(r#"<div class="palette">"#);
    for (name, color) in Palette.iter() {
        let _ = write!(
            body,
            r#"<button type="button" class="add-color" data-color="{name}" title="{name}"><span class="swatch" style="background:{}"></span>{name}</button>"#,
            color.to_css()
        );
    }
    body.push_str("</div>");

    let picked: Vec<&str> = view.subset.split(',').map(str::trim).collect();
    body.push_str(r#"<div class="subset">"#);
    for (name, color) in Palette.iter() {
        let sel = if picked.contains(&name) { " selected" } else { "" };
        let _ = write!(
            body,
            r#"<button type="button" class="subset-color{sel}" data-color="{name}" title="{name}"><span class="swatch" style="background:{}"></span></button>"#,
            color.to_css()
        );
    }
    body.push_str("</div>");

    let src = view.img_b64.map(|img| format!("data:image/png;base64,{img}")).unwrap_or_default();
    let _ = write!(body, r#"<div id="previewContainer" class="preview"><img id="previewImg" alt="preview" src="{src}"></div>"#);
    legend_list(&mut body, view.legend);
    if let Some(grid) = view.grid {
        grid_table(&mut body, grid);
    }
    body.push_str(r#"<div class="history"><h2>History</h2><p class="history-empty">No history yet</p><div class="history-gallery"></div></div>"#);

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>Dye Grid</title>
    <style>
        .swatch {{ display: inline-block; width: 1em; height: 1em; margin-right: 0.3em; }}
        .preview img {{ image-rendering: pixelated; }}
        .error {{ color: #B02E26; }}
        .subset-color.selected {{ outline: 2px solid #1D1D21; }}
        .history-item.active {{ outline: 2px solid #3AB3DA; }}
        .history-item img {{ width: 64px; image-rendering: pixelated; }}
        .loading {{ opacity: 0.5; }}
    </style>
    <script src="{SCRIPT_PATH}" defer></script>
</head>
<body>
{body}
</body>
</html>"#
    )
}
