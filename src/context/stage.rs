//! Deployment-stage path prefixes injected by the gateway in front of the application.

// self
use crate::{_prelude::*, error::ConfigError};

/// Built-in deployment stages, in matching order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
	/// Production stage (`/prod`).
	Prod,
	/// Development stage (`/dev`).
	Dev,
	/// Staging stage (`/staging`).
	Staging,
}
impl Stage {
	/// Built-in stages in the order they are matched.
	pub const ALL: [Stage; 3] = [Stage::Prod, Stage::Dev, Stage::Staging];

	/// Stage name as it appears in the path.
	pub const fn as_str(self) -> &'static str {
		match self {
			Stage::Prod => "prod",
			Stage::Dev => "dev",
			Stage::Staging => "staging",
		}
	}

	/// Path prefix including the leading slash.
	pub const fn prefix(self) -> &'static str {
		match self {
			Stage::Prod => "/prod",
			Stage::Dev => "/dev",
			Stage::Staging => "/staging",
		}
	}
}
impl Display for Stage {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Ordered list of recognized stage prefixes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StagePrefixes(Arc<[String]>);
impl StagePrefixes {
	/// Builds a custom prefix list, validating each entry.
	///
	/// Every prefix must start with `/`, name at least one character after it, and must not
	/// end with `/`.
	pub fn new<I, S>(prefixes: I) -> Result<Self, ConfigError>
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let mut validated = Vec::new();

		for prefix in prefixes {
			let prefix = prefix.into();

			if prefix.len() < 2 || !prefix.starts_with('/') || prefix.ends_with('/') {
				return Err(ConfigError::InvalidStagePrefix { prefix });
			}

			validated.push(prefix);
		}

		Ok(Self(Arc::from(validated)))
	}

	/// Iterator over prefixes in matching order.
	pub fn iter(&self) -> impl Iterator<Item = &str> {
		self.0.iter().map(String::as_str)
	}

	/// Splits `path` into the first matching prefix and the application-relative remainder.
	///
	/// Only a match at position 0 on a segment boundary counts: `/prod/x` yields
	/// `(Some("/prod"), "/x")`, while `/production` and `/api/prod/x` are returned untouched.
	pub fn strip<'p>(&self, path: &'p str) -> (Option<&str>, &'p str) {
		for prefix in self.iter() {
			let Some(rest) = path.strip_prefix(prefix) else {
				continue;
			};

			if rest.is_empty() || rest.starts_with('/') {
				return (Some(prefix), rest);
			}
		}

		(None, path)
	}
}
impl Default for StagePrefixes {
	fn default() -> Self {
		Self(Stage::ALL.iter().map(|stage| stage.prefix().to_owned()).collect())
	}
}
