//! Diagnostic events emitted by the loader.

/// A single state change observed by the loader.
///
/// Transitions carry no functional weight. They are only forwarded to `tracing` and
/// to the observer installed with [`Loader::with_observer`]( crate::Loader::with_observer )
/// when [`LoaderConfig::trace_transitions`]( crate::LoaderConfig ) is enabled.
#[derive( Debug, Clone, PartialEq, Eq )]
pub enum Transition {
	/// A load was requested for the library.
	Requested( String ),
	/// The request was queued until `blocker` finishes loading.
	Deferred { library: String, blocker: String },
	/// The library's load target is about to run.
	Loading( String ),
	/// The library's load target completed.
	Loaded( String ),
	/// A queued request is being driven again because its blocker finished.
	Resumed( String ),
	/// The library's load target reported failure.
	Failed( String ),
	/// A queued request was dropped because it can never resume.
	Abandoned { library: String, blocker: String },
}

impl Transition {
	/// The library the event is about.
	pub fn library( &self ) -> &str {
		match self {
			Self::Requested( library )
			| Self::Loading( library )
			| Self::Loaded( library )
			| Self::Resumed( library )
			| Self::Failed( library )
			| Self::Deferred { library, .. }
			| Self::Abandoned { library, .. } => library,
		}
	}
}

impl std::fmt::Display for Transition {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		match self {
			Self::Requested( library ) => write!( f, "Request to load {}", library ),
			Self::Deferred { library, blocker } if library == blocker =>
				write!( f, "Deferring load of {} until it finishes loading", library ),
			Self::Deferred { library, blocker } => write!( f, "Deferring load of {} until {} is loaded", library, blocker ),
			Self::Loading( library ) => write!( f, "Loading {}", library ),
			Self::Loaded( library ) => write!( f, "Loaded {}", library ),
			Self::Resumed( library ) => write!( f, "Resuming deferred load of {}", library ),
			Self::Failed( library ) => write!( f, "Failed to load {}", library ),
			Self::Abandoned { library, blocker } => write!( f, "Abandoning load of {} waiting on {}", library, blocker ),
		}
	}
}

#[cfg( test )]
mod tests {
	use super::Transition ;

	#[test]
	fn display_names_the_blocker() {
		let deferred = Transition::Deferred { library: "b".into(), blocker: "a".into() };
		assert_eq!( deferred.to_string(), "Deferring load of b until a is loaded" );
		assert_eq!( deferred.library(), "b" );

		let reentrant = Transition::Deferred { library: "a".into(), blocker: "a".into() };
		assert_eq!( reentrant.to_string(), "Deferring load of a until it finishes loading" );
	}
}
