//! Error types for scanning and transformation

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

use crate::component::ComponentId;
use crate::instruction::InstructionError;
use crate::template::Span;

/// Template text that the scanner cannot tokenize
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    #[error("malformed attribute at {offset}: {message}. Last scan at '{context}'")]
    MalformedAttribute {
        offset: usize,
        message: String,
        /// Source text from the offending offset to the end of its line
        context: String,
    },

    #[error("tag <{tag}> starting at {offset} is never closed with '>'")]
    UnterminatedTag { offset: usize, tag: String },
}

impl ScanError {
    pub(crate) fn malformed(source: &str, offset: usize, message: &str) -> Self {
        let rest = source.get(offset..).unwrap_or_default();
        let context = rest.lines().next().unwrap_or_default().to_string();
        ScanError::MalformedAttribute {
            offset,
            message: message.to_string(),
            context,
        }
    }

    /// Byte offset the error points at
    pub fn offset(&self) -> usize {
        match self {
            ScanError::MalformedAttribute { offset, .. } | ScanError::UnterminatedTag { offset, .. } => {
                *offset
            }
        }
    }

    fn span(&self, source: &str) -> Span {
        let start = self.offset().min(source.len());
        let len = match self {
            ScanError::MalformedAttribute { .. } => source
                .get(start..)
                .and_then(|rest| rest.chars().next())
                .map_or(0, char::len_utf8),
            ScanError::UnterminatedTag { tag, .. } => tag.len() + 1,
        };
        start..(start + len).min(source.len())
    }

    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        let mut buf = Vec::new();
        let span = self.span(source);
        let (message, label) = match self {
            ScanError::MalformedAttribute { message, .. } => {
                ("malformed attribute".to_string(), message.clone())
            }
            ScanError::UnterminatedTag { tag, .. } => (
                format!("unterminated tag <{}>", tag),
                "tag opened here is never closed with '>'".to_string(),
            ),
        };

        let written = Report::build(ReportKind::Error, filename, span.start)
            .with_message(message)
            .with_label(
                Label::new((filename, span))
                    .with_message(label)
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(source)), &mut buf);

        match written {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => self.to_string(),
        }
    }
}

/// Errors raised while rewriting a single template
#[derive(Error, Debug)]
pub enum ModifyError {
    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error("instruction failed: {0}")]
    Instruction(#[source] InstructionError),
}

/// Errors that abort a whole component transformation
#[derive(Error, Debug)]
pub enum CpuError {
    /// Template of a component could not be scanned
    #[error("template of {component} is not valid: {source}")]
    Scan {
        component: ComponentId,
        #[source]
        source: ScanError,
    },

    /// A hook of the instruction failed
    #[error("instruction failed: {0}")]
    Instruction(#[source] InstructionError),

    /// Id does not belong to the component store
    #[error("unknown {0}")]
    UnknownComponent(ComponentId),
}

impl CpuError {
    pub(crate) fn from_modify(component: ComponentId, err: ModifyError) -> Self {
        match err {
            ModifyError::Scan(source) => CpuError::Scan { component, source },
            ModifyError::Instruction(err) => CpuError::Instruction(err),
        }
    }
}
