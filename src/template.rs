//! Renders a user-supplied Jinja template against a placement report, which
//! is how the tool produces CSS (or anything else) describing the sprite.

use std::{borrow::Cow, io, path::PathBuf};

use fs_err as fs;
use gridpack::PlacementReport;
use minijinja::{AutoEscape, Environment, UndefinedBehavior};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("couldn't render template")]
    Render(#[from] minijinja::Error),
}

/// Where the template text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    Inline(String),
    Path(PathBuf),
}

impl TemplateSource {
    /// Picks whichever template option was given, if any. The two options
    /// are mutually exclusive at the command line, so at most one is set.
    pub fn from_options(inline: Option<String>, path: Option<PathBuf>) -> Option<Self> {
        inline
            .map(TemplateSource::Inline)
            .or_else(|| path.map(TemplateSource::Path))
    }

    fn load(&self) -> Result<Cow<'_, str>, TemplateError> {
        match self {
            TemplateSource::Inline(text) => Ok(Cow::Borrowed(text.as_str())),
            TemplateSource::Path(path) => {
                log::debug!("Reading template from {}", path.display());
                Ok(Cow::Owned(fs::read_to_string(path)?))
            }
        }
    }

    fn name(&self) -> Cow<'_, str> {
        match self {
            TemplateSource::Inline(_) => Cow::Borrowed("<inline>"),
            TemplateSource::Path(path) => path.to_string_lossy(),
        }
    }
}

pub fn render(source: &TemplateSource, report: &PlacementReport) -> Result<String, TemplateError> {
    let text = source.load()?;
    let name = source.name();

    let mut env = Environment::new();

    // Referencing a field that doesn't exist is almost always a typo in the
    // template, so it should fail loudly instead of rendering nothing.
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env.set_auto_escape_callback(|_| AutoEscape::None);
    env.add_template(&name, &text)?;

    let rendered = env.get_template(&name)?.render(report)?;

    Ok(rendered)
}

#[cfg(test)]
mod test {
    use super::*;

    use std::path::Path;

    use gridpack::{GridPacker, GridSpec, Size};

    fn report() -> PlacementReport {
        let layout = GridPacker::new(GridSpec::Auto)
            .pack(vec![Size::new(4, 4), Size::new(8, 2)])
            .unwrap();

        let names = vec!["a.png".to_owned(), "b.png".to_owned()];

        PlacementReport::new(&layout, &names, Path::new("sprite.png"))
    }

    fn inline(text: &str) -> TemplateSource {
        TemplateSource::Inline(text.to_owned())
    }

    #[test]
    fn from_options() {
        assert_eq!(TemplateSource::from_options(None, None), None);
        assert_eq!(
            TemplateSource::from_options(Some("x".to_owned()), None),
            Some(inline("x"))
        );
        assert_eq!(
            TemplateSource::from_options(None, Some(PathBuf::from("t.css"))),
            Some(TemplateSource::Path(PathBuf::from("t.css")))
        );
    }

    #[test]
    fn css_background_positions() {
        let template = inline(
            "{% for image in images %}\
             .sprite-{{ image.count }} { background-position: -{{ image.x }}px -{{ image.y }}px; width: {{ width }}px; }\n\
             {% endfor %}{{ output.path }} {{ output.count }}",
        );

        let rendered = render(&template, &report()).unwrap();

        assert_eq!(
            rendered,
            ".sprite-1 { background-position: -0px -0px; width: 8px; }\n\
             .sprite-2 { background-position: -8px -0px; width: 8px; }\n\
             sprite.png 2"
        );
    }

    #[test]
    fn offsets_and_sizes() {
        let template = inline(
            "{% for image in images %}{{ image.filename }}:{{ image.x_offset }},{{ image.y_offset }}:\
             {{ image.size.width }}x{{ image.size.height }};{% endfor %}",
        );

        let rendered = render(&template, &report()).unwrap();

        assert_eq!(rendered, "a.png:2,0:4x4;b.png:0,1:8x2;");
    }

    #[test]
    fn grid_fields() {
        let template = inline("{{ grid_size.width }}x{{ grid_size.height }} {{ vertical }}");

        assert_eq!(render(&template, &report()).unwrap(), "16x4 false");
    }

    #[test]
    fn undefined_field_is_error() {
        let template = inline("{{ images[0].nope }}");

        let err = render(&template, &report()).unwrap_err();
        assert!(matches!(err, TemplateError::Render(_)));
    }

    #[test]
    fn syntax_error() {
        let template = inline("{% for image in images %}");

        assert!(matches!(
            render(&template, &report()),
            Err(TemplateError::Render(_))
        ));
    }

    #[test]
    fn from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sprite.css.j2");
        std::fs::write(&path, "{{ count }} images\n").unwrap();

        let rendered = render(&TemplateSource::Path(path), &report()).unwrap();

        assert_eq!(rendered, "2 images");
    }

    #[test]
    fn missing_file() {
        let template = TemplateSource::Path(PathBuf::from("does/not/exist.j2"));

        assert!(matches!(
            render(&template, &report()),
            Err(TemplateError::Io(_))
        ));
    }
}
