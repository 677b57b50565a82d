use std::fmt;
use std::path::PathBuf;

pub type LoadResult<T> = Result<T, LoadError>;

pub const IS_EMPTY: &str = "is empty";
pub const IS_DUPLICATE: &str = "is duplicate";
pub const NOT_FOUND: &str = "not found";

// ---------------------------------------------------------------------------
// MultiError: every rule violation found in one validation pass
// ---------------------------------------------------------------------------

/// Ordered collection of validation messages.
///
/// Validators never stop at the first broken rule. They push everything they
/// find through a [`Scope`] and the caller decides, once the pass is over,
/// whether the aggregate is an error at all (see [`MultiError::into_result`]).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultiError {
    errors: Vec<String>,
}

impl MultiError {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, err: impl fmt::Display) {
        self.errors.push(err.to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn messages(&self) -> &[String] {
        &self.errors
    }

    /// Root scope with no prefix.
    pub fn scope(&mut self) -> Scope<'_> {
        Scope { errors: &mut self.errors, prefix: None }
    }

    /// View that prepends `"<prefix>: "` to everything added through it.
    pub fn with_prefix(&mut self, prefix: impl fmt::Display) -> Scope<'_> {
        Scope {
            errors: &mut self.errors,
            prefix: Some(prefix.to_string()),
        }
    }

    /// `Ok(value)` if nothing was reported, otherwise the aggregate itself.
    pub fn into_result<T>(self, value: T) -> Result<T, MultiError> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl fmt::Display for MultiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.errors.len() {
            0 => return write!(f, "0 errors"),
            1 => write!(f, "1 error:")?,
            n => write!(f, "{n} errors:")?,
        }
        for msg in self.errors.iter().filter(|m| !m.is_empty()) {
            write!(f, "\n- {msg}")?;
        }
        Ok(())
    }
}

impl std::error::Error for MultiError {}

/// Prefixed handle onto a shared [`MultiError`] list.
///
/// Scopes nest: `errs.with_prefix("row 3").with_prefix("home goals")` adds
/// messages as `"row 3: home goals: <msg>"`.
#[derive(Debug)]
pub struct Scope<'a> {
    errors: &'a mut Vec<String>,
    prefix: Option<String>,
}

impl Scope<'_> {
    pub fn add(&mut self, err: impl fmt::Display) {
        let msg = match &self.prefix {
            Some(prefix) => format!("{prefix}: {err}"),
            None => err.to_string(),
        };
        self.errors.push(msg);
    }

    pub fn with_prefix(&mut self, prefix: impl fmt::Display) -> Scope<'_> {
        let prefix = match &self.prefix {
            Some(outer) => format!("{outer}: {prefix}"),
            None => prefix.to_string(),
        };
        Scope { errors: &mut *self.errors, prefix: Some(prefix) }
    }

    /// True when the underlying list (not just this scope) is empty.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }
}

// ---------------------------------------------------------------------------
// LoadError: structural / I/O failures, reported immediately
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum LoadError {
    Io { path: PathBuf, source: std::io::Error },
    Json { context: &'static str, source: serde_json::Error },
    Csv(csv::Error),
    Structure(String),
    NoSweepstakes,
    NotFound(String),
    Network(reqwest::Error, String),
    Status(u16),
    ContentType(String),
    Body(reqwest::Error),
    Context(String, Box<LoadError>),
    Invalid(MultiError),
}

impl LoadError {
    /// Wrap with a static description of the step that failed.
    pub fn context(self, context: impl Into<String>) -> Self {
        LoadError::Context(context.into(), Box::new(self))
    }

    /// The validation aggregate, looking through any context wrappers.
    pub fn validation(&self) -> Option<&MultiError> {
        match self {
            LoadError::Invalid(errs) => Some(errs),
            LoadError::Context(_, inner) => inner.validation(),
            _ => None,
        }
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io { path, source } => {
                write!(f, "cannot read file '{}': {source}", path.display())
            }
            LoadError::Json { context, source } => write!(f, "cannot unmarshal {context}: {source}"),
            LoadError::Csv(e) => write!(f, "cannot read file: {e}"),
            LoadError::Structure(msg) => write!(f, "{msg}"),
            LoadError::NoSweepstakes => write!(f, "no sweepstakes found in source data"),
            LoadError::NotFound(msg) => write!(f, "{msg}: {NOT_FOUND}"),
            LoadError::Network(e, url) => write!(f, "cannot perform request for {url}: {e}"),
            LoadError::Status(code) => write!(f, "non-200 status code: {code}"),
            LoadError::ContentType(ct) => write!(f, "invalid response content type: {ct}"),
            LoadError::Body(e) => write!(f, "cannot read request body: {e}"),
            LoadError::Context(context, inner) => write!(f, "{context}: {inner}"),
            LoadError::Invalid(errs) => write!(f, "{errs}"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io { source, .. } => Some(source),
            LoadError::Json { source, .. } => Some(source),
            LoadError::Csv(e) => Some(e),
            LoadError::Network(e, _) | LoadError::Body(e) => Some(e),
            LoadError::Context(_, inner) => Some(inner.as_ref()),
            LoadError::Invalid(errs) => Some(errs),
            _ => None,
        }
    }
}

impl From<MultiError> for LoadError {
    fn from(errs: MultiError) -> Self {
        LoadError::Invalid(errs)
    }
}

impl From<csv::Error> for LoadError {
    fn from(e: csv::Error) -> Self {
        LoadError::Csv(e)
    }
}

/// Read a whole file, tagging failures with the path.
pub(crate) fn read_file(path: &std::path::Path) -> LoadResult<Vec<u8>> {
    std::fs::read(path).map_err(|source| LoadError::Io { path: path.to_path_buf(), source })
}
