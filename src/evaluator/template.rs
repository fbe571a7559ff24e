use std::sync::OnceLock;

use crate::error::LLMError;

use super::types::TaskKind;

pub const DEFAULT_JUDGE_PROMPT: &str = "You are an expert evaluator. Compare the following expected output and actual response, and determine if the response meets the expectations for the task '{task_type}'.

### Expected Output:
{expected_output}

### Actual Response:
{response}

Based on the expected output and the actual response, does the response meet the expectations? Reply with 'Yes' if it meets the expectations, or 'No' if it does not, followed by a brief explanation.
";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    TaskType,
    ExpectedOutput,
    Response,
}

impl Field {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "task_type" => Some(Field::TaskType),
            "expected_output" => Some(Field::ExpectedOutput),
            "response" => Some(Field::Response),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field(Field),
}

/// A judge prompt with `{task_type}`, `{expected_output}` and `{response}`
/// placeholders, validated once when it is parsed.
///
/// `{{` and `}}` produce literal braces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    segments: Vec<Segment>,
}

impl PromptTemplate {
    /// Parses a user-supplied template. Blank input selects the default prompt.
    pub fn parse(source: &str) -> Result<Self, LLMError> {
        if source.trim().is_empty() {
            return Ok(Self::default());
        }
        Self::compile(source)
    }

    fn compile(source: &str) -> Result<Self, LLMError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = source.char_indices().peekable();

        while let Some((pos, c)) = chars.next() {
            match c {
                '{' if matches!(chars.peek(), Some((_, '{'))) => {
                    chars.next();
                    literal.push('{');
                }
                '}' if matches!(chars.peek(), Some((_, '}'))) => {
                    chars.next();
                    literal.push('}');
                }
                '{' => {
                    let mut name = String::new();
                    let mut closed = false;
                    for (_, inner) in chars.by_ref() {
                        if inner == '}' {
                            closed = true;
                            break;
                        }
                        name.push(inner);
                    }
                    if !closed {
                        return Err(LLMError::Configuration(format!(
                            "Judge prompt has an unclosed '{{' at position {pos}"
                        )));
                    }
                    let field = Field::parse(name.trim()).ok_or_else(|| {
                        LLMError::Configuration(format!(
                            "Judge prompt uses unknown placeholder {{{name}}}; expected {{task_type}}, {{expected_output}} or {{response}} (write {{{{ and }}}} for literal braces)"
                        ))
                    })?;
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Field(field));
                }
                '}' => {
                    return Err(LLMError::Configuration(format!(
                        "Judge prompt has an unmatched '}}' at position {pos}"
                    )));
                }
                other => literal.push(other),
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }
        Ok(Self { segments })
    }

    pub fn render(&self, task: TaskKind, expected_output: &str, response: &str) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Field(Field::TaskType) => out.push_str(task.as_str()),
                Segment::Field(Field::ExpectedOutput) => out.push_str(expected_output),
                Segment::Field(Field::Response) => out.push_str(response),
            }
        }
        out
    }
}

static DEFAULT_TEMPLATE: OnceLock<PromptTemplate> = OnceLock::new();

impl Default for PromptTemplate {
    /// [`DEFAULT_JUDGE_PROMPT`], compiled once.
    fn default() -> Self {
        DEFAULT_TEMPLATE
            .get_or_init(|| {
                PromptTemplate::compile(DEFAULT_JUDGE_PROMPT).expect("default judge prompt is valid")
            })
            .clone()
    }
}
