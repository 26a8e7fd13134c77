//! Library records.
//!
//! A [`Library`] is a named unit of one-time initialisation: an opaque load target
//! plus the ordered list of library names that must be loaded before it. Dependencies
//! may name libraries that haven't been registered yet; only loading such a name is
//! an error.

/// A registered library.
///
/// The target is consumed when the library starts loading, so a record that has
/// begun loading no longer holds one.
///
/// # Type Parameters
/// - `T`: The load target handed to the [`LoadTarget`]( crate::LoadTarget ) boundary
#[derive( Debug, Clone )]
pub struct Library<T> {
	/// Unique name of this library
	name: String,
	/// Initialisation target, taken out when loading begins
	target: Option<T>,
	/// Names of the libraries that must be loaded first, in declared order
	dependencies: Vec<String>,
}

impl<T> Library<T> {

	/// Creates a new library record.
	#[inline]
	pub fn new(
		name: impl Into<String>,
		target: T,
		dependencies: impl IntoIterator<Item = impl Into<String>>,
	) -> Self {
		Self {
			name: name.into(),
			target: Some( target ),
			dependencies: dependencies.into_iter().map( Into::into ).collect(),
		}
	}

	/// Unique name of this library.
	#[inline] pub fn name( &self ) -> &str { &self.name }

	/// Declared dependencies in the order they will be loaded.
	#[inline] pub fn dependencies( &self ) -> &[String] { &self.dependencies }

	/// The load target, or `None` once loading has begun.
	#[inline] pub fn target( &self ) -> Option<&T> { self.target.as_ref() }

	#[inline] pub(crate) fn take_target( &mut self ) -> Option<T> { self.target.take() }

}
