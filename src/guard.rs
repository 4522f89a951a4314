//! Client-side route access control.
//!
//! Before a view is entered the [`RouteGuard`] decides whether to allow the
//! navigation or send the user elsewhere. The decision only looks at the
//! session snapshot and a static [`RoutePolicy`]; it never calls the server.

use tracing::debug;

use crate::session::{Session, SessionStore};

/// Path of the login view.
pub const LOGIN_PATH: &str = "/login";

/// Where users without the required role are sent.
pub const FALLBACK_PATH: &str = "/courses";

/// Navigation decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Allow,
    Redirect(String),
}

impl Verdict {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Verdict::Allow)
    }

    /// The redirect target, if any.
    pub fn target(&self) -> Option<&str> {
        match self {
            Verdict::Allow => None,
            Verdict::Redirect(path) => Some(path),
        }
    }
}

/// Paths reserved for a set of roles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRule {
    pub path: String,
    pub allowed_roles: Vec<String>,
}

impl RouteRule {
    pub fn new<I, S>(path: impl Into<String>, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            path: normalize(&path.into()).to_string(),
            allowed_roles: roles.into_iter().map(Into::into).collect(),
        }
    }

    fn permits(&self, role: Option<&str>) -> bool {
        role.is_some_and(|role| self.allowed_roles.iter().any(|r| r == role))
    }
}

/// Static access rules.
///
/// Rules are checked in insertion order; the first rule whose path matches
/// decides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePolicy {
    login_path: String,
    fallback_path: String,
    rules: Vec<RouteRule>,
    aliases: Vec<(String, String)>,
}

impl Default for RoutePolicy {
    /// Course creation is teacher-only, and `/` opens the login view.
    fn default() -> Self {
        Self::new(LOGIN_PATH, FALLBACK_PATH)
            .with_rule(RouteRule::new("/courses/new", ["teacher"]))
            .with_alias("/", LOGIN_PATH)
    }
}

impl RoutePolicy {
    /// A policy with no rules or aliases.
    pub fn new(login_path: impl Into<String>, fallback_path: impl Into<String>) -> Self {
        Self {
            login_path: normalize(&login_path.into()).to_string(),
            fallback_path: normalize(&fallback_path.into()).to_string(),
            rules: Vec::new(),
            aliases: Vec::new(),
        }
    }

    pub fn with_rule(mut self, rule: RouteRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Rewrite navigations to `from` into navigations to `to`.
    pub fn with_alias(mut self, from: &str, to: &str) -> Self {
        self.aliases
            .push((normalize(from).to_string(), normalize(to).to_string()));
        self
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    pub fn fallback_path(&self) -> &str {
        &self.fallback_path
    }

    pub fn rules(&self) -> &[RouteRule] {
        &self.rules
    }

    /// The path a navigation to `path` actually lands on.
    pub fn resolve<'a>(&'a self, path: &'a str) -> &'a str {
        let path = normalize(path);
        self.aliases
            .iter()
            .find(|(from, _)| from == path)
            .map_or(path, |(_, to)| to.as_str())
    }

    /// Decide whether `session` may enter `path`.
    ///
    /// The login view is always reachable. Anywhere else needs a token, and
    /// a path covered by a rule also needs one of the rule's roles.
    pub fn check(&self, path: &str, session: &Session) -> Verdict {
        let path = normalize(path);

        if path == self.login_path {
            return Verdict::Allow;
        }

        if !session.is_authenticated() {
            return Verdict::Redirect(self.login_path.clone());
        }

        match self.rules.iter().find(|rule| rule.path == path) {
            Some(rule) if !rule.permits(session.role()) => {
                Verdict::Redirect(self.fallback_path.clone())
            }
            _ => Verdict::Allow,
        }
    }
}

/// Strip the query, the fragment and any trailing slash.
fn normalize(path: &str) -> &str {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    let path = &path[..end];
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() && path.starts_with('/') {
        "/"
    } else {
        trimmed
    }
}

/// Route guard bound to the live session.
#[derive(Debug, Clone)]
pub struct RouteGuard {
    policy: RoutePolicy,
    session: SessionStore,
}

impl RouteGuard {
    pub fn new(policy: RoutePolicy, session: SessionStore) -> Self {
        Self { policy, session }
    }

    pub fn policy(&self) -> &RoutePolicy {
        &self.policy
    }

    /// Decide a navigation to `path` against the current session.
    ///
    /// Aliases are applied first. When the navigation is allowed but lands
    /// on a different path, the verdict is a redirect to that path.
    pub fn navigate(&self, path: &str) -> Verdict {
        let target = self.policy.resolve(path);
        let verdict = match self.policy.check(target, &self.session.snapshot()) {
            Verdict::Allow if target != normalize(path) => Verdict::Redirect(target.to_string()),
            verdict => verdict,
        };
        debug!(path, ?verdict, "Navigation checked");
        verdict
    }
}
