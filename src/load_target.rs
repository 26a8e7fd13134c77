//! The boundary between the loader and library initialisation code.
//!
//! The loader never knows what loading a library means. It only hands the library's
//! target to [`LoadTarget::load`] and observes success or failure. The target gets
//! the loader itself, so initialisation code may register further libraries or
//! request other loads while it runs.

use crate::loader::Loader ;



/// Initialisation code for a library.
///
/// The target is consumed: a library is loaded at most once, so its target is moved
/// out of the registry right before this is called.
///
/// # Example
///
/// ```
/// use mod_link::{ LoadTarget, Loader };
///
/// #[derive( Debug )]
/// struct Module( &'static str );
///
/// impl LoadTarget for Module {
///     type Error = std::io::Error ;
///     fn load( self, name: &str, loader: &mut Loader<Self> ) -> Result<(), Self::Error> {
///         if name == "core" {
///             // Initialisation may discover and load more libraries.
///             loader.register( "core.extra", Module( "extra" ), [ "core" ]);
///             let _ = loader.request_load( "core.extra" );
///         }
///         Ok(())
///     }
/// }
///
/// let mut loader = Loader::new();
/// loader.register( "core", Module( "core" ), Vec::<String>::new() );
/// loader.request_load( "core" ).unwrap();
/// assert_eq!( loader.loaded_libraries(), &[ "core".to_string(), "core.extra".to_string() ]);
/// ```
pub trait LoadTarget: Sized {
	/// Failure reported by the initialisation code.
	type Error: std::error::Error + 'static ;

	/// Runs the library's one-time initialisation.
	///
	/// # Errors
	/// Any error marks the library as failed; it will never be loaded.
	fn load( self, name: &str, loader: &mut Loader<Self> ) -> Result<(), Self::Error> ;
}

type InitialiserFn<E> = Box<dyn FnOnce( &str, &mut Loader<Initialiser<E>> ) -> Result<(), E>> ;

/// A [`LoadTarget`] backed by a closure.
///
/// ```
/// use mod_link::{ Initialiser, Loader };
///
/// let mut loader = Loader::<Initialiser<std::io::Error>>::new();
/// loader.register( "a", Initialiser::noop(), Vec::<String>::new() );
/// loader.register( "b", Initialiser::new(| _name, loader | {
///     assert!( loader.status_of( "a" ).is_loaded() );
///     Ok(())
/// }), [ "a" ]);
/// loader.request_load( "b" ).unwrap();
/// ```
pub struct Initialiser<E: std::error::Error + 'static>( InitialiserFn<E> );

impl<E: std::error::Error + 'static> Initialiser<E> {

	/// Wraps a closure as a load target.
	pub fn new( init: impl FnOnce( &str, &mut Loader<Self> ) -> Result<(), E> + 'static ) -> Self {
		Self( Box::new( init ))
	}

	/// A target with no initialisation code.
	pub fn noop() -> Self { Self::new(| _, _ | Ok(()))}

}

impl<E: std::error::Error + 'static> LoadTarget for Initialiser<E> {
	type Error = E ;
	fn load( self, name: &str, loader: &mut Loader<Self> ) -> Result<(), E> { ( self.0 )( name, loader )}
}

impl<E: std::error::Error + 'static> std::fmt::Debug for Initialiser<E> {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_tuple( "Initialiser" ).field( &"<closure>" ).finish()
	}
}
