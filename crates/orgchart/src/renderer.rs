//! Hand-off of diagram descriptions to an external renderer.
//!
//! Graph construction is synchronous. Rendering is the one asynchronous step:
//! a [`DiagramRenderer`] receives a [`DiagramRequest`] and resolves to markup or
//! a [`RenderFailure`]. Failures are local to this step. The description is
//! never patched up to make a renderer happy, and nothing upstream is retried.

use crate::visualization::DiagramRequest;
use std::future::Future;
use std::io;
use std::path::PathBuf;
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, warn};

/// Why a renderer could not produce markup
#[derive(Debug, Error)]
pub enum RenderFailure {
    /// The renderer rejected the description
    #[error("Renderer rejected diagram '{diagram_id}': {message}")]
    Rejected { diagram_id: String, message: String },

    /// The renderer could not be reached or started
    #[error("Renderer unavailable: {0}")]
    Unavailable(String),

    /// The renderer reported success but produced nothing
    #[error("Renderer produced no output for diagram '{0}'")]
    EmptyOutput(String),

    #[error("Renderer I/O error: {0}")]
    Io(#[from] io::Error),
}

impl RenderFailure {
    /// Diagram the failure refers to, when the renderer reported one
    pub fn diagram_id(&self) -> Option<&str> {
        match self {
            RenderFailure::Rejected { diagram_id, .. } => Some(diagram_id),
            RenderFailure::EmptyOutput(diagram_id) => Some(diagram_id),
            RenderFailure::Unavailable(_) | RenderFailure::Io(_) => None,
        }
    }
}

/// External component turning a description into markup.
pub trait DiagramRenderer {
    /// Render one description. Implementations must not alter `request`.
    fn render(
        &self,
        request: &DiagramRequest,
    ) -> impl Future<Output = Result<String, RenderFailure>> + Send;
}

/// Outcome of a render hand-off, as reported to the caller
#[derive(Debug)]
pub enum RenderOutcome {
    Rendered(String),
    Failed(RenderFailure),
}

impl RenderOutcome {
    pub fn is_rendered(&self) -> bool {
        matches!(self, RenderOutcome::Rendered(_))
    }

    /// Markup, if rendering succeeded
    pub fn markup(&self) -> Option<&str> {
        match self {
            RenderOutcome::Rendered(markup) => Some(markup),
            RenderOutcome::Failed(_) => None,
        }
    }

    pub fn into_result(self) -> Result<String, RenderFailure> {
        match self {
            RenderOutcome::Rendered(markup) => Ok(markup),
            RenderOutcome::Failed(failure) => Err(failure),
        }
    }
}

/// Hand a request to a renderer and report the outcome.
///
/// A failure is logged and returned as a value; it is never fatal and no
/// partial markup is returned with it.
pub async fn render_diagram<R>(renderer: &R, request: &DiagramRequest) -> RenderOutcome
where
    R: DiagramRenderer + ?Sized,
{
    match renderer.render(request).await {
        Ok(markup) if markup.trim().is_empty() => {
            let failure = RenderFailure::EmptyOutput(request.diagram_id.clone());
            warn!(diagram_id = %request.diagram_id, "failed to render diagram: {}", failure);
            RenderOutcome::Failed(failure)
        }
        Ok(markup) => {
            debug!(diagram_id = %request.diagram_id, bytes = markup.len(), "rendered diagram");
            RenderOutcome::Rendered(markup)
        }
        Err(failure) => {
            warn!(diagram_id = %request.diagram_id, "failed to render diagram: {}", failure);
            RenderOutcome::Failed(failure)
        }
    }
}

/// Wraps the description in a fenced `mermaid` block.
///
/// Useful wherever the final rendering happens client-side, e.g. Markdown
/// viewers that understand Mermaid fences.
#[derive(Debug, Clone, Default)]
pub struct MarkdownRenderer;

impl DiagramRenderer for MarkdownRenderer {
    async fn render(&self, request: &DiagramRequest) -> Result<String, RenderFailure> {
        Ok(format!(
            "<!-- diagram: {} -->\n```mermaid\n{}```\n",
            request.diagram_id, request.description
        ))
    }
}

/// Renders SVG by invoking the Mermaid CLI (`mmdc`).
#[derive(Debug, Clone)]
pub struct MermaidCliRenderer {
    program: PathBuf,
    extra_args: Vec<String>,
}

impl Default for MermaidCliRenderer {
    fn default() -> Self {
        Self::new("mmdc")
    }
}

impl MermaidCliRenderer {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            extra_args: Vec::new(),
        }
    }

    /// Additional arguments passed before the input/output flags
    pub fn with_args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.extra_args.extend(args.into_iter().map(Into::into));
        self
    }
}

impl DiagramRenderer for MermaidCliRenderer {
    async fn render(&self, request: &DiagramRequest) -> Result<String, RenderFailure> {
        let workdir = tempfile::tempdir()?;
        let input = workdir.path().join("diagram.mmd");
        let output = workdir.path().join("diagram.svg");
        tokio::fs::write(&input, &request.description).await?;

        let result = Command::new(&self.program)
            .args(&self.extra_args)
            .arg("--svgId")
            .arg(&request.diagram_id)
            .arg("--input")
            .arg(&input)
            .arg("--output")
            .arg(&output)
            .output()
            .await;

        let result = match result {
            Ok(result) => result,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(RenderFailure::Unavailable(format!(
                    "'{}' not found on PATH",
                    self.program.display()
                )));
            }
            Err(e) => return Err(RenderFailure::Io(e)),
        };

        if !result.status.success() {
            return Err(RenderFailure::Rejected {
                diagram_id: request.diagram_id.clone(),
                message: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            });
        }

        match tokio::fs::read_to_string(&output).await {
            Ok(svg) if !svg.trim().is_empty() => Ok(svg),
            Ok(_) => Err(RenderFailure::EmptyOutput(request.diagram_id.clone())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(RenderFailure::EmptyOutput(request.diagram_id.clone()))
            }
            Err(e) => Err(RenderFailure::Io(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> DiagramRequest {
        DiagramRequest {
            description: "flowchart TD\n  n_1[\"A\"]:::current\n".to_string(),
            diagram_id: "org-1".to_string(),
        }
    }

    struct RejectingRenderer;

    impl DiagramRenderer for RejectingRenderer {
        async fn render(&self, request: &DiagramRequest) -> Result<String, RenderFailure> {
            Err(RenderFailure::Rejected {
                diagram_id: request.diagram_id.clone(),
                message: "Parse error on line 2".to_string(),
            })
        }
    }

    struct BlankRenderer;

    impl DiagramRenderer for BlankRenderer {
        async fn render(&self, _request: &DiagramRequest) -> Result<String, RenderFailure> {
            Ok("   ".to_string())
        }
    }

    #[tokio::test]
    async fn test_markdown_renderer_wraps_description() {
        let outcome = render_diagram(&MarkdownRenderer, &request()).await;

        let markup = outcome.markup().unwrap();
        assert!(markup.contains("<!-- diagram: org-1 -->"));
        assert!(markup.contains("```mermaid\nflowchart TD\n"));
        assert!(markup.trim_end().ends_with("```"));
    }

    #[tokio::test]
    async fn test_rejection_is_reported_not_raised() {
        let outcome = render_diagram(&RejectingRenderer, &request()).await;

        assert!(!outcome.is_rendered());
        assert!(outcome.markup().is_none());
        match outcome.into_result() {
            Err(RenderFailure::Rejected { diagram_id, message }) => {
                assert_eq!(diagram_id, "org-1");
                assert!(message.contains("Parse error"));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_blank_markup_is_a_failure() {
        let outcome = render_diagram(&BlankRenderer, &request()).await;

        assert!(matches!(
            outcome,
            RenderOutcome::Failed(RenderFailure::EmptyOutput(ref id)) if id == "org-1"
        ));
    }

    #[tokio::test]
    async fn test_missing_cli_is_unavailable() {
        let renderer = MermaidCliRenderer::new("orgchart-test-no-such-renderer-binary");
        let outcome = render_diagram(&renderer, &request()).await;

        assert!(matches!(
            outcome,
            RenderOutcome::Failed(RenderFailure::Unavailable(_))
        ));
    }

    #[test]
    fn test_cli_renderer_defaults_to_mmdc() {
        let renderer = MermaidCliRenderer::default().with_args(["--quiet", "--theme", "neutral"]);

        assert_eq!(renderer.program, PathBuf::from("mmdc"));
        assert_eq!(renderer.extra_args, vec!["--quiet", "--theme", "neutral"]);
    }

    #[tokio::test]
    async fn test_request_is_not_mutated() {
        let original = request();
        let copy = original.clone();
        let _ = render_diagram(&RejectingRenderer, &original).await;

        assert_eq!(original, copy);
    }
}
