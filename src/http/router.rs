use crate::config::StaticFilesConfig;

/// Where a request path leads.
///
/// Computed once per request, then consumed by the response-building step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteOutcome {
    /// Tell the client to fetch `location` instead (301).
    Redirect { location: String },
    /// Attempt to serve the file at `resolved_path`. Whether it exists is
    /// only discovered when the response is built.
    ServeFile { resolved_path: String },
    /// No rule matched. The current rule set never produces this (every
    /// non-redirect path is attempted as a file), but future rules may,
    /// and it is answered like a missing file.
    NotFound,
}

/// The fixed routing rule set, bound to a static-files root.
pub struct Router {
    root: String,
}

impl Router {
    pub fn new(cfg: &StaticFilesConfig) -> Self {
        Self {
            root: cfg.root.clone(),
        }
    }

    /// Maps a request path to a routing outcome. Rules, checked in order:
    ///
    /// 1. `/page1.html` redirects permanently to `/page2.html`.
    /// 2. `/` is rewritten to `/index.html`.
    /// 3. Anything else resolves to `root + path` by plain string
    ///    concatenation. There is no normalization, so `..` segments pass
    ///    through to the filesystem untouched.
    pub fn route(&self, path: &str) -> RouteOutcome {
        if path == "/page1.html" {
            return RouteOutcome::Redirect {
                location: "/page2.html".to_string(),
            };
        }

        let path = if path == "/" { "/index.html" } else { path };

        RouteOutcome::ServeFile {
            resolved_path: format!("{}{}", self.root, path),
        }
    }
}
