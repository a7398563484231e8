//! Request path classification.
//!
//! The Swagger UI bundle is a fixed set of files. A request is accepted when
//! its path ends in one of those file names, optionally followed by a query
//! string; whatever precedes the file name is the mount prefix.

use std::sync::OnceLock;

use http::Method;
use regex::Regex;

/// A file name the adapter knows how to answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetName {
    /// `index.html`, the templated entry page.
    Index,
    /// `doc.json`, the API description document.
    DocJson,
    /// `favicon-16x16.png`
    Favicon16,
    /// `favicon-32x32.png`
    Favicon32,
    /// `oauth2-redirect.html`
    OAuth2Redirect,
    /// `swagger-ui.css`
    SwaggerUiCss,
    /// `swagger-ui.css.map`
    SwaggerUiCssMap,
    /// `swagger-ui.js`
    SwaggerUiJs,
    /// `swagger-ui.js.map`
    SwaggerUiJsMap,
    /// `swagger-ui-bundle.js`
    BundleJs,
    /// `swagger-ui-bundle.js.map`
    BundleJsMap,
    /// `swagger-ui-standalone-preset.js`
    StandalonePresetJs,
    /// `swagger-ui-standalone-preset.js.map`
    StandalonePresetJsMap,
}

impl AssetName {
    /// Every recognized asset.
    pub const ALL: [Self; 13] = [
        Self::Index,
        Self::DocJson,
        Self::Favicon16,
        Self::Favicon32,
        Self::OAuth2Redirect,
        Self::SwaggerUiCss,
        Self::SwaggerUiCssMap,
        Self::SwaggerUiJs,
        Self::SwaggerUiJsMap,
        Self::BundleJs,
        Self::BundleJsMap,
        Self::StandalonePresetJs,
        Self::StandalonePresetJsMap,
    ];

    /// The file name as it appears at the end of the request path.
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Index => "index.html",
            Self::DocJson => "doc.json",
            Self::Favicon16 => "favicon-16x16.png",
            Self::Favicon32 => "favicon-32x32.png",
            Self::OAuth2Redirect => "oauth2-redirect.html",
            Self::SwaggerUiCss => "swagger-ui.css",
            Self::SwaggerUiCssMap => "swagger-ui.css.map",
            Self::SwaggerUiJs => "swagger-ui.js",
            Self::SwaggerUiJsMap => "swagger-ui.js.map",
            Self::BundleJs => "swagger-ui-bundle.js",
            Self::BundleJsMap => "swagger-ui-bundle.js.map",
            Self::StandalonePresetJs => "swagger-ui-standalone-preset.js",
            Self::StandalonePresetJsMap => "swagger-ui-standalone-preset.js.map",
        }
    }

    /// Looks an asset up by its exact file name.
    pub fn from_file_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|asset| asset.file_name() == name)
    }

    /// Content type derived from the file extension.
    ///
    /// Source maps have no entry here; the fallback handler picks their type.
    pub fn content_type(&self) -> Option<&'static str> {
        content_type_for(self.file_name())
    }
}

/// Content type for a recognized file name, keyed on its final extension.
pub fn content_type_for(file_name: &str) -> Option<&'static str> {
    let extension = file_name.rsplit_once('.').map(|(_, ext)| ext)?;
    match extension {
        "html" => Some("text/html; charset=utf-8"),
        "css" => Some("text/css; charset=utf-8"),
        "js" => Some("application/javascript"),
        "png" => Some("image/png"),
        "json" => Some("application/json; charset=utf-8"),
        _ => None,
    }
}

/// A successfully classified request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathMatch<'a> {
    /// Everything before the asset file name, e.g. `/swagger/`.
    pub prefix: &'a str,
    /// The asset requested.
    pub asset: AssetName,
}

/// Why a request was not classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Only GET is served.
    MethodNotAllowed,
    /// The path does not end in a known asset name.
    NotFound,
}

/// Classifies request paths against the fixed asset grammar.
#[derive(Debug, Clone)]
pub struct PathMatcher {
    pattern: Regex,
}

impl Default for PathMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl PathMatcher {
    /// Creates a matcher for the Swagger UI asset names.
    pub fn new() -> Self {
        Self {
            pattern: asset_pattern().clone(),
        }
    }

    /// Classifies a request by method and path (query string allowed).
    ///
    /// # Example
    ///
    /// ```rust
    /// use docserve::matcher::{AssetName, PathMatcher, Rejection};
    /// use http::Method;
    ///
    /// let matcher = PathMatcher::new();
    /// let matched = matcher.classify(&Method::GET, "/swagger/index.html?x=1").unwrap();
    /// assert_eq!(matched.prefix, "/swagger/");
    /// assert_eq!(matched.asset, AssetName::Index);
    ///
    /// assert_eq!(
    ///     matcher.classify(&Method::POST, "/swagger/index.html"),
    ///     Err(Rejection::MethodNotAllowed)
    /// );
    /// ```
    pub fn classify<'a>(&self, method: &Method, path: &'a str) -> Result<PathMatch<'a>, Rejection> {
        if method != Method::GET {
            return Err(Rejection::MethodNotAllowed);
        }

        let captures = self.pattern.captures(path).ok_or(Rejection::NotFound)?;
        let (Some(prefix), Some(name)) = (captures.get(1), captures.get(2)) else {
            return Err(Rejection::NotFound);
        };
        let asset = AssetName::from_file_name(name.as_str()).ok_or(Rejection::NotFound)?;

        Ok(PathMatch {
            prefix: prefix.as_str(),
            asset,
        })
    }
}

fn asset_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        let names = AssetName::ALL
            .iter()
            .map(|asset| regex::escape(asset.file_name()))
            .collect::<Vec<_>>()
            .join("|");
        Regex::new(&format!(r"^(.*?)({names})(?:\?.*)?$")).expect("asset pattern is valid")
    })
}
