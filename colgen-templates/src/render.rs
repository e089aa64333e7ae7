use std::sync::OnceLock;

use colgen_palette::{color_to_hex, color_to_hex_stripped, Colors, Mode, Srgb};
use regex::{Captures, Regex};

use crate::TemplateError;

/// Values a template can refer to.
#[derive(Debug, Clone, Copy)]
pub struct TemplateContext<'a> {
    pub colors: &'a Colors,
    /// Absolute path of the wallpaper the scheme came from.
    pub image: &'a str,
    pub mode: Mode,
}

/// Loop variables bound by `<* for name, value in colors *>`.
#[derive(Debug, Clone, Copy)]
struct LoopScope<'a> {
    key_var: &'a str,
    value_var: &'a str,
    name: &'static str,
    color: Srgb<u8>,
}

fn for_open() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"<\*\s*for\s+(\w+)\s*,\s*(\w+)\s+in\s+colors\s*\*>").expect("valid regex")
    })
}

fn for_close() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<\*\s*endfor\s*\*>").expect("valid regex"))
}

fn expression() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{\{\s*([A-Za-z_]\w*(?:\.\w+)*)\s*\}\}").expect("valid regex"))
}

/// Renders a template written in matugen syntax.
///
/// Supported: `{{colors.<role>.default.hex}}` (and `hex_stripped`),
/// `{{image}}`, `{{mode}}`, and non-nested
/// `<* for name, value in colors *> ... <* endfor *>` loops where the body
/// may use `{{name}}` and `{{value.default.hex}}`.
pub fn render(template: &str, ctx: &TemplateContext<'_>) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = for_open().captures(rest) {
        let Some(whole) = open.get(0) else {
            break;
        };
        out.push_str(&substitute(&rest[..whole.start()], ctx, None)?);

        let after_open = &rest[whole.end()..];
        let Some(close) = for_close().find(after_open) else {
            let consumed = template.len() - rest.len() + whole.start();
            let line = template[..consumed].matches('\n').count() + 1;
            return Err(TemplateError::UnclosedLoop { line });
        };

        let body = &after_open[..close.start()];
        for (name, color) in ctx.colors.iter() {
            let scope = LoopScope {
                key_var: &open[1],
                value_var: &open[2],
                name,
                color,
            };
            out.push_str(&substitute(body, ctx, Some(&scope))?);
        }
        rest = &after_open[close.end()..];
    }

    out.push_str(&substitute(rest, ctx, None)?);
    Ok(out)
}

fn substitute(text: &str, ctx: &TemplateContext<'_>, scope: Option<&LoopScope<'_>>) -> Result<String, TemplateError> {
    let mut error = None;
    let rendered = expression().replace_all(text, |caps: &Captures<'_>| {
        match resolve(&caps[1], ctx, scope) {
            Ok(value) => value,
            Err(e) => {
                error.get_or_insert(e);
                String::new()
            }
        }
    });
    match error {
        Some(e) => Err(e),
        None => Ok(rendered.into_owned()),
    }
}

fn resolve(path: &str, ctx: &TemplateContext<'_>, scope: Option<&LoopScope<'_>>) -> Result<String, TemplateError> {
    let parts: Vec<&str> = path.split('.').collect();

    match parts.as_slice() {
        ["image"] => Ok(ctx.image.to_string()),
        ["mode"] => Ok(ctx.mode.name().to_string()),
        [var] if scope.is_some_and(|s| s.key_var == *var) => Ok(scope.map_or("", |s| s.name).to_string()),
        ["colors", name, field @ ..] => {
            let color = ctx
                .colors
                .get(name)
                .ok_or_else(|| TemplateError::UnknownColor(name.to_string()))?;
            format_color(color, field, path)
        }
        [var, field @ ..] if scope.is_some_and(|s| s.value_var == *var) => {
            let color = scope.map(|s| s.color).ok_or_else(|| TemplateError::UnknownField(path.to_string()))?;
            format_color(color, field, path)
        }
        [var] => {
            log::warn!("template variable '{var}' is not defined");
            Ok(String::new())
        }
        _ => Err(TemplateError::UnknownField(path.to_string())),
    }
}

fn format_color(color: Srgb<u8>, field: &[&str], path: &str) -> Result<String, TemplateError> {
    match field {
        ["default", "hex"] | ["hex"] => Ok(color_to_hex(color)),
        ["default", "hex_stripped"] | ["hex_stripped"] => Ok(color_to_hex_stripped(color)),
        _ => Err(TemplateError::UnknownField(path.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn colors() -> Colors {
        Colors::new(vec![
            ("primary", Srgb::new(0xff, 0xb3, 0xad)),
            ("on_primary", Srgb::new(0x57, 0x1e, 0x1b)),
        ])
    }

    fn ctx(colors: &Colors) -> TemplateContext<'_> {
        TemplateContext {
            colors,
            image: "/home/me/wall.png",
            mode: Mode::Dark,
        }
    }

    #[test]
    fn substitutes_color_references() {
        let colors = colors();
        let out = render(
            "bg = {{colors.primary.default.hex}}\nfg = {{ colors.on_primary.default.hex_stripped }}\n",
            &ctx(&colors),
        )
        .unwrap();
        assert_eq!(out, "bg = #ffb3ad\nfg = 571e1b\n");
    }

    #[test]
    fn substitutes_image_and_mode() {
        let colors = colors();
        let out = render("{{image}} {{ mode }}", &ctx(&colors)).unwrap();
        assert_eq!(out, "/home/me/wall.png dark");
    }

    #[test]
    fn expands_loops_in_role_order() {
        let colors = colors();
        let template = "{\n<* for name, value in colors *>  \"{{name}}\": \"{{value.default.hex}}\",\n<* endfor *>}";
        let out = render(template, &ctx(&colors)).unwrap();
        assert_eq!(
            out,
            "{\n  \"primary\": \"#ffb3ad\",\n  \"on_primary\": \"#571e1b\",\n}"
        );
    }

    #[test]
    fn text_after_loop_is_rendered() {
        let colors = colors();
        let out = render(
            "<*for k,v in colors*>{{k}} <*endfor*>| {{colors.primary.hex}}",
            &ctx(&colors),
        )
        .unwrap();
        assert_eq!(out, "primary on_primary | #ffb3ad");
    }

    #[test]
    fn unknown_color_is_an_error() {
        let colors = colors();
        let err = render("{{colors.nope.default.hex}}", &ctx(&colors)).unwrap_err();
        assert!(matches!(err, TemplateError::UnknownColor(name) if name == "nope"));
    }

    #[test]
    fn unknown_field_is_an_error() {
        let colors = colors();
        let err = render("{{colors.primary.default.rgb}}", &ctx(&colors)).unwrap_err();
        assert!(matches!(err, TemplateError::UnknownField(_)));
    }

    #[test]
    fn unknown_plain_variable_renders_empty() {
        let colors = colors();
        assert_eq!(render("a{{wallpaper}}b", &ctx(&colors)).unwrap(), "ab");
    }

    #[test]
    fn unclosed_loop_reports_line() {
        let colors = colors();
        let err = render("one\ntwo <* for a, b in colors *>", &ctx(&colors)).unwrap_err();
        assert!(matches!(err, TemplateError::UnclosedLoop { line: 2 }));
    }

    #[test]
    fn loop_variables_do_not_leak() {
        let colors = colors();
        let err = render("<* for k, v in colors *><* endfor *>{{v.default.hex}}", &ctx(&colors)).unwrap_err();
        assert!(matches!(err, TemplateError::UnknownField(_)));
    }
}
