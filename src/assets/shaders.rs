use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::render::shaders::ShaderStage;

/// Marker token that introduces a new section in a combined shader file.
const SECTION_MARKER: &str = "#shader";

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Failed to open shader file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A vertex/fragment source pair. An absent section is the empty string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSource {
    pub vertex: String,
    pub fragment: String,
}

impl ShaderSource {
    pub fn new(vertex: &str, fragment: &str) -> Self {
        Self {
            vertex: vertex.to_string(),
            fragment: fragment.to_string(),
        }
    }

    /// Reads a combined shader file and splits it into its two sections.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| SourceError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::parse(&text))
    }

    /// Splits combined shader text on `#shader vertex` / `#shader fragment`
    /// marker lines. Lines outside any section are dropped.
    pub fn parse(text: &str) -> Self {
        let mut vertex = String::new();
        let mut fragment = String::new();
        let mut target: Option<ShaderStage> = None;

        for line in text.lines() {
            if line.contains(SECTION_MARKER) {
                if line.contains("vertex") {
                    target = Some(ShaderStage::Vertex);
                } else if line.contains("fragment") {
                    target = Some(ShaderStage::Fragment);
                } else {
                    log::warn!("Ignoring unrecognized shader section marker: {:?}", line);
                    target = None;
                }
                continue;
            }

            match target {
                Some(ShaderStage::Vertex) => {
                    vertex.push_str(line);
                    vertex.push('\n');
                }
                Some(ShaderStage::Fragment) => {
                    fragment.push_str(line);
                    fragment.push('\n');
                }
                None => {}
            }
        }

        Self { vertex, fragment }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_two_sections() {
        let source = ShaderSource::parse("#shader vertex\nA\n#shader fragment\nB\n");
        assert_eq!(source.vertex, "A\n");
        assert_eq!(source.fragment, "B\n");
    }

    #[test]
    fn test_parse_keeps_lines_verbatim() {
        let text = "#shader vertex\n#version 330 core\n\nvoid main() {}\n#shader fragment\nout vec4 color;\nvoid main() {}\n";
        let source = ShaderSource::parse(text);
        assert_eq!(source.vertex, "#version 330 core\n\nvoid main() {}\n");
        assert_eq!(source.fragment, "out vec4 color;\nvoid main() {}\n");
    }

    #[test]
    fn test_parse_vertex_only() {
        let source = ShaderSource::parse("#shader vertex\nA\n");
        assert_eq!(source.vertex, "A\n");
        assert_eq!(source.fragment, "");
    }

    #[test]
    fn test_parse_drops_lines_before_first_marker() {
        let source = ShaderSource::parse("prelude\n#shader vertex\nA\n");
        assert_eq!(source.vertex, "A\n");
        assert_eq!(source.fragment, "");
    }

    #[test]
    fn test_parse_drops_lines_under_unknown_marker() {
        let source =
            ShaderSource::parse("#shader vertex\nA\n#shader geometry\nG\n#shader fragment\nB\n");
        assert_eq!(source.vertex, "A\n");
        assert_eq!(source.fragment, "B\n");
    }

    #[test]
    fn test_parse_is_deterministic() {
        let text = "#shader vertex\nA\n#shader fragment\nB\n";
        assert_eq!(ShaderSource::parse(text), ShaderSource::parse(text));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "#shader vertex\nA\n#shader fragment\nB\n").unwrap();

        let source = ShaderSource::load(file.path()).unwrap();
        assert_eq!(source.vertex, "A\n");
        assert_eq!(source.fragment, "B\n");

        // A second load sees the same result
        assert_eq!(ShaderSource::load(file.path()).unwrap(), source);
    }

    #[test]
    fn test_load_missing_file() {
        let err = ShaderSource::load("does/not/exist.shader").unwrap_err();
        match err {
            SourceError::Open { path, .. } => {
                assert_eq!(path, Path::new("does/not/exist.shader"));
            }
        }
    }
}
