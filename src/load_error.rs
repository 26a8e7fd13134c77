use std::sync::Arc ;
use itertools::Itertools ;
use nonempty_collections::NEVec ;
use thiserror::Error ;

use crate::load_state::InvalidTransition ;



/// Errors that can occur while loading libraries.
///
/// The primary error of a request is returned to whoever made it. Errors from
/// requests that were resumed after their blocker finished, and unknown-library
/// reports, have no direct caller; they are returned alongside the result of the
/// outermost request via [`PartialResult`]( crate::PartialResult ).
#[derive( Error )]
pub enum LoadError<E: std::error::Error + 'static> {

	/// Loads were requested for names that were never registered. Detected once the
	/// outermost request completes, since registering a name later is legal.
	#[error( "Unknown libraries [{}] required by [{}]", join_names( .missing ), join_names( .stalled ))]
	UnknownLibrary {
		/// Requested names with no registration
		missing: NEVec<String>,
		/// Requests that were waiting on the missing names, directly or transitively
		stalled: Vec<String>,
	},

	/// The library's load target reported failure. The library will never load.
	///
	/// The source is shared: the same failure goes to the request that triggered it
	/// and to the outermost request of the pass.
	#[error( "Failed to load '{library}': {source}" )]
	LoadFailed { library: String, source: Arc<E> },

	/// A load was requested for a library whose load target already failed.
	#[error( "'{0}' previously failed to load" )]
	AlreadyFailed( String ),

	/// A dependency of the library failed to load.
	#[error( "Cannot load '{library}': dependency '{dependency}' failed to load" )]
	DependencyFailed { library: String, dependency: String },

	/// Declared dependencies form a cycle. The path starts and ends with the same name.
	#[error( "Dependency cycle detected: {}", .0.join( " -> " ))]
	DependencyCycle( Vec<String> ),

	/// The loader attempted a status change that would break monotonicity.
	#[error( "{0}" )]
	InvalidTransition( #[from] InvalidTransition ),

}

impl<E: std::error::Error + 'static> LoadError<E> {
	/// The library the error is about. For unknown libraries this is the first missing name.
	pub fn library( &self ) -> &str {
		match self {
			Self::UnknownLibrary { missing, .. } => missing.first().as_str(),
			Self::LoadFailed { library, .. }
			| Self::DependencyFailed { library, .. }
			| Self::AlreadyFailed( library ) => library.as_str(),
			Self::DependencyCycle( path ) => path.first().map_or( "", String::as_str ),
			Self::InvalidTransition( err ) => err.library.as_str(),
		}
	}

	/// The library whose load target failed, if this is a [`LoadError::LoadFailed`].
	pub(crate) fn failed_library( &self ) -> Option<&str> {
		match self {
			Self::LoadFailed { library, .. } => Some( library.as_str() ),
			_ => None,
		}
	}
}

/// Drops load-target failures that `reported` already carries.
pub(crate) fn without_reported<E: std::error::Error + 'static>(
	errors: Vec<LoadError<E>>,
	reported: &[LoadError<E>],
) -> Vec<LoadError<E>> {
	errors.into_iter()
		.filter(| err | err.failed_library().is_none_or(| library | reported.iter()
			.all(| other | other.failed_library() != Some( library ))
		))
		.collect()
}

impl<E: std::error::Error + 'static> std::fmt::Debug for LoadError<E> {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		match self {
			Self::UnknownLibrary { missing, stalled } => f.debug_struct( "UnknownLibrary" )
				.field( "missing", missing )
				.field( "stalled", stalled )
				.finish(),
			Self::LoadFailed { library, source } => f.debug_struct( "LoadFailed" ).field( "library", library ).field( "source", source ).finish(),
			Self::AlreadyFailed( library ) => f.debug_tuple( "AlreadyFailed" ).field( library ).finish(),
			Self::DependencyFailed { library, dependency } => f.debug_struct( "DependencyFailed" )
				.field( "library", library )
				.field( "dependency", dependency )
				.finish(),
			Self::DependencyCycle( path ) => f.debug_tuple( "DependencyCycle" ).field( path ).finish(),
			Self::InvalidTransition( err ) => f.debug_tuple( "InvalidTransition" ).field( err ).finish(),
		}
	}
}

fn join_names<'a>( names: impl IntoIterator<Item = &'a String> ) -> String {
	names.into_iter().join( ", " )
}
