//! The library registry.
//!
//! Maps names to [`Library`] records. The registry only grows: entries may be
//! overwritten but never removed, and insertion order is preserved so bulk requests
//! and diagnostic output are deterministic.

use indexmap::IndexMap ;
use indexmap::map::Entry ;

use crate::library::Library ;



/// Name-keyed store of every library known to a [`Loader`]( crate::Loader ).
#[derive( Debug, Clone )]
pub struct Registry<T> {
	libraries: IndexMap<String, Library<T>>,
}

impl<T> Default for Registry<T> {
	fn default() -> Self { Self { libraries: IndexMap::new() }}
}

impl<T> Registry<T> {

	/// Creates an empty registry.
	pub fn new() -> Self { Self::default() }

	/// Inserts or overwrites the record for `library.name()`.
	///
	/// An overwritten record keeps its original position in the registration order.
	/// Returns the dependency list of the record it replaced, if any.
	pub(crate) fn insert( &mut self, library: Library<T> ) -> Option<Vec<String>> {
		match self.libraries.entry( library.name().to_string() ) {
			Entry::Occupied( mut entry ) => {
				let previous = std::mem::replace( entry.get_mut(), library );
				Some( previous.dependencies().to_vec() )
			},
			Entry::Vacant( entry ) => {
				entry.insert( library );
				None
			},
		}
	}

	/// Looks up a library by name.
	#[inline] pub fn lookup( &self, name: &str ) -> Option<&Library<T>> { self.libraries.get( name ) }

	#[inline] pub(crate) fn lookup_mut( &mut self, name: &str ) -> Option<&mut Library<T>> { self.libraries.get_mut( name ) }

	/// Whether a library with this name has been registered.
	#[inline] pub fn contains( &self, name: &str ) -> bool { self.libraries.contains_key( name ) }

	/// Declared dependencies of `name`, if it is registered.
	pub fn dependencies_of( &self, name: &str ) -> Option<&[String]> {
		self.lookup( name ).map( Library::dependencies )
	}

	/// Registered names in registration order.
	pub fn names( &self ) -> impl Iterator<Item = &str> { self.libraries.keys().map( String::as_str ) }

	/// Registered libraries in registration order.
	pub fn iter( &self ) -> impl Iterator<Item = &Library<T>> { self.libraries.values() }

	/// Number of registered libraries.
	#[inline] pub fn len( &self ) -> usize { self.libraries.len() }

	/// Whether nothing has been registered yet.
	#[inline] pub fn is_empty( &self ) -> bool { self.libraries.is_empty() }

}

#[cfg( test )]
mod tests {
	use super::* ;

	#[test]
	fn overwrite_keeps_position_and_returns_previous_dependencies() {
		let mut registry = Registry::new();
		assert_eq!( registry.insert( Library::new( "a", 1, [ "x" ])), None );
		assert_eq!( registry.insert( Library::new( "b", 2, Vec::<String>::new() )), None );
		assert_eq!( registry.insert( Library::new( "a", 3, [ "y" ])), Some( vec![ "x".to_string() ]));

		assert_eq!( registry.names().collect::<Vec<_>>(), vec![ "a", "b" ]);
		assert_eq!( registry.lookup( "a" ).and_then( Library::target ), Some( &3 ));
		assert_eq!( registry.dependencies_of( "a" ), Some( &[ "y".to_string() ][..] ));
	}

	#[test]
	fn forward_references_are_not_registered() {
		let mut registry = Registry::new();
		registry.insert( Library::new( "a", (), [ "not-yet" ]));
		assert!( registry.contains( "a" ));
		assert!( !registry.contains( "not-yet" ));
		assert_eq!( registry.dependencies_of( "not-yet" ), None );
		assert_eq!( registry.len(), 1 );
	}
}
