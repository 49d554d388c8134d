use super::event_log_struct::{EventLog, EventLogError, Trace};

///
/// Error encountered while parsing the textual trace notation (e.g., `<a,b,c>,<a,c,b>`)
///
/// Positions are character offsets into the input.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceParseError {
    /// Input does not contain any trace
    Empty,
    /// A character was found where it is not allowed
    UnexpectedCharacter {
        /// Character offset
        position: usize,
        /// Offending character
        found: char,
    },
    /// A trace opened with `<` is never closed with `>`
    UnclosedTrace {
        /// Character offset of the opening `<`
        position: usize,
    },
    /// A trace without any activities (`<>`)
    EmptyTrace {
        /// Index of the trace (0-based)
        trace_index: usize,
    },
    /// An empty activity label (e.g., `<a,,b>`)
    EmptyLabel {
        /// Index of the trace (0-based)
        trace_index: usize,
    },
}

impl std::fmt::Display for TraceParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TraceParseError::Empty => write!(f, "Failed to parse log: no traces given"),
            TraceParseError::UnexpectedCharacter { position, found } => write!(
                f,
                "Failed to parse log: unexpected character '{}' at position {}",
                found, position
            ),
            TraceParseError::UnclosedTrace { position } => write!(
                f,
                "Failed to parse log: trace starting at position {} is not closed with '>'",
                position
            ),
            TraceParseError::EmptyTrace { trace_index } => write!(
                f,
                "Failed to parse log: trace #{} contains no activities",
                trace_index + 1
            ),
            TraceParseError::EmptyLabel { trace_index } => write!(
                f,
                "Failed to parse log: trace #{} contains an empty activity label",
                trace_index + 1
            ),
        }
    }
}

impl std::error::Error for TraceParseError {}

impl From<EventLogError> for TraceParseError {
    fn from(e: EventLogError) -> Self {
        match e {
            EventLogError::EmptyLog => TraceParseError::Empty,
            EventLogError::EmptyTrace(trace_index) => TraceParseError::EmptyTrace { trace_index },
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Mode {
    /// Expecting `<` (start of the next trace)
    BeforeTrace,
    /// Inside a trace, collecting the current label
    InTrace { opened_at: usize },
    /// After `>`, expecting `,` or end of input
    AfterTrace,
    /// After the `,` at `at`, expecting `<`
    AfterSeparator { at: usize },
}

///
/// Parse an [`EventLog`] from the angle-bracket notation
///
/// Each trace is written as `<` + comma-separated activity labels + `>`; traces are separated by `,`.
/// Whitespace around labels and between traces is ignored.
///
/// ```rust
/// use alpha_mining::event_log::import_trace_text::parse_event_log;
///
/// let log = parse_event_log("<a,b,c>, <a,c,b>").unwrap();
/// assert_eq!(log.traces().len(), 2);
/// assert_eq!(log.traces()[1].activities(), ["a", "c", "b"]);
/// ```
pub fn parse_event_log(input: &str) -> Result<EventLog, TraceParseError> {
    let mut traces: Vec<Trace> = Vec::new();
    let mut current_trace: Vec<String> = Vec::new();
    let mut current_label = String::new();
    let mut mode = Mode::BeforeTrace;

    for (position, c) in input.chars().enumerate() {
        match mode {
            Mode::BeforeTrace | Mode::AfterSeparator { .. } => match c {
                '<' => mode = Mode::InTrace { opened_at: position },
                c if c.is_whitespace() => {}
                found => return Err(TraceParseError::UnexpectedCharacter { position, found }),
            },
            Mode::InTrace { .. } => match c {
                ',' | '>' => {
                    let trace_index = traces.len();
                    let label = current_label.trim();
                    if label.is_empty() {
                        if c == '>' && current_trace.is_empty() {
                            return Err(TraceParseError::EmptyTrace { trace_index });
                        }
                        return Err(TraceParseError::EmptyLabel { trace_index });
                    }
                    current_trace.push(label.to_string());
                    current_label.clear();
                    if c == '>' {
                        let trace = Trace::new(std::mem::take(&mut current_trace))
                            .ok_or(TraceParseError::EmptyTrace { trace_index })?;
                        traces.push(trace);
                        mode = Mode::AfterTrace;
                    }
                }
                '<' => return Err(TraceParseError::UnexpectedCharacter { position, found: c }),
                c => current_label.push(c),
            },
            Mode::AfterTrace => match c {
                ',' => mode = Mode::AfterSeparator { at: position },
                c if c.is_whitespace() => {}
                found => return Err(TraceParseError::UnexpectedCharacter { position, found }),
            },
        }
    }

    match mode {
        Mode::InTrace { opened_at } => Err(TraceParseError::UnclosedTrace {
            position: opened_at,
        }),
        // Trailing separator without a following trace
        Mode::AfterSeparator { at } => Err(TraceParseError::UnexpectedCharacter {
            position: at,
            found: ',',
        }),
        _ => Ok(EventLog::new(traces)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn as_vecs(log: &EventLog) -> Vec<Vec<&str>> {
        log.traces()
            .iter()
            .map(|t| t.activities().iter().map(String::as_str).collect())
            .collect()
    }

    #[test]
    fn parses_reference_notation() {
        let log = parse_event_log("<a,b,c>,<a,c,b>").unwrap();
        assert_eq!(as_vecs(&log), vec![vec!["a", "b", "c"], vec!["a", "c", "b"]]);
    }

    #[test]
    fn tolerates_whitespace_and_long_labels() {
        let log = parse_event_log("  < register , check stock >,\n<register>  ").unwrap();
        assert_eq!(
            as_vecs(&log),
            vec![vec!["register", "check stock"], vec!["register"]]
        );
    }

    #[test]
    fn rejects_malformed_input() {
        assert_eq!(parse_event_log(""), Err(TraceParseError::Empty));
        assert_eq!(parse_event_log("   "), Err(TraceParseError::Empty));
        assert_eq!(
            parse_event_log("<a,b"),
            Err(TraceParseError::UnclosedTrace { position: 0 })
        );
        assert_eq!(
            parse_event_log("<a>,<>"),
            Err(TraceParseError::EmptyTrace { trace_index: 1 })
        );
        assert_eq!(
            parse_event_log("<a,,b>"),
            Err(TraceParseError::EmptyLabel { trace_index: 0 })
        );
        assert_eq!(
            parse_event_log("a,b"),
            Err(TraceParseError::UnexpectedCharacter {
                position: 0,
                found: 'a'
            })
        );
        assert_eq!(
            parse_event_log("<a><b>"),
            Err(TraceParseError::UnexpectedCharacter {
                position: 3,
                found: '<'
            })
        );
        assert_eq!(
            parse_event_log("<a>,"),
            Err(TraceParseError::UnexpectedCharacter {
                position: 3,
                found: ','
            })
        );
        assert_eq!(
            parse_event_log("<a>,  "),
            Err(TraceParseError::UnexpectedCharacter {
                position: 3,
                found: ','
            })
        );
        assert!(matches!(
            parse_event_log("<a<b>"),
            Err(TraceParseError::UnexpectedCharacter { position: 2, .. })
        ));
    }
}
