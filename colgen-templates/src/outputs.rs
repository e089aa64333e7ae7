use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::render::{render, TemplateContext};
use crate::TemplateError;

/// A template file and every config file its output is copied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateTarget {
    pub template: &'static str,
    pub outputs: &'static [&'static str],
}

pub const TEMPLATE_OUTPUTS: &[TemplateTarget] = &[
    TemplateTarget {
        template: "qs_json.js",
        outputs: &[
            "~/.config/quickshell/Colors.json",
            "~/.config/quickshell/lockscreen/Colors.json",
            "~/.config/quickshell/menu/Colors.json",
        ],
    },
    TemplateTarget {
        template: "hypr-colrs.conf",
        outputs: &["~/.config/hypr/colors.conf"],
    },
    TemplateTarget {
        template: "ghostty",
        outputs: &["~/.config/ghostty/themes/Matugen.conf"],
    },
    TemplateTarget {
        template: "gtk.css",
        outputs: &["~/.config/gtk-3.0/colors.css", "~/.config/gtk-4.0/colors.css"],
    },
    TemplateTarget {
        template: "micro.micro",
        outputs: &["~/.config/micro/colorschemes/matugen.micro"],
    },
];

/// Rendered content bound for one output path (not yet expanded).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub output: String,
    pub content: String,
}

fn env_var() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\$(?:\{(\w+)\}|(\w+))").expect("valid regex"))
}

/// Expands a leading `~` and `$VAR` / `${VAR}` from the process environment.
pub fn expand_path(path: &str) -> PathBuf {
    expand_path_with(path, |name| std::env::var(name).ok())
}

/// [`expand_path`] with a custom variable lookup. Unknown variables are left
/// as written.
pub fn expand_path_with(path: &str, lookup: impl Fn(&str) -> Option<String>) -> PathBuf {
    let expanded = env_var().replace_all(path, |caps: &Captures<'_>| {
        let name = caps.get(1).or_else(|| caps.get(2)).map_or("", |m| m.as_str());
        lookup(name).unwrap_or_else(|| caps[0].to_string())
    });

    match expanded.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => match lookup("HOME") {
            Some(home) => PathBuf::from(format!("{home}{rest}")),
            None => PathBuf::from(expanded.as_ref()),
        },
        _ => PathBuf::from(expanded.as_ref()),
    }
}

/// Reads and renders `name` from `templates_dir`.
pub fn render_template(templates_dir: &Path, name: &str, ctx: &TemplateContext<'_>) -> Result<String, TemplateError> {
    let path = templates_dir.join(name);
    if !path.exists() {
        return Err(TemplateError::NotFound(path));
    }
    let raw = fs::read_to_string(&path).map_err(|source| TemplateError::Io {
        path: path.clone(),
        source,
    })?;
    render(&raw, ctx)
}

/// Renders every known template present in `templates_dir`.
///
/// Missing templates are skipped silently; templates that fail to render are
/// logged and skipped.
pub fn render_all(templates_dir: &Path, ctx: &TemplateContext<'_>) -> Vec<Rendered> {
    let mut results = Vec::new();

    for target in TEMPLATE_OUTPUTS {
        if !templates_dir.join(target.template).exists() {
            log::debug!("no template {}, skipping", target.template);
            continue;
        }

        match render_template(templates_dir, target.template, ctx) {
            Ok(content) => {
                results.extend(target.outputs.iter().map(|output| Rendered {
                    output: output.to_string(),
                    content: content.clone(),
                }));
            }
            Err(e) => log::error!("Error rendering {}: {e}", target.template),
        }
    }
    results
}

/// Writes each rendered template to its expanded output path and returns
/// the paths that were written. Failed writes are logged and skipped.
pub fn write_outputs(rendered: &[Rendered]) -> Vec<PathBuf> {
    let mut written = Vec::with_capacity(rendered.len());

    for item in rendered {
        let path = expand_path(&item.output);
        match write_file(&path, &item.content) {
            Ok(()) => {
                log::debug!("wrote {}", path.display());
                written.push(path);
            }
            Err(e) => log::error!("Error writing {}: {e}", path.display()),
        }
    }
    written
}

fn write_file(path: &Path, content: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)
}
