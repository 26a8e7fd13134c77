//! A lazy, dependency-ordered loader for library initialisers.
//!
//! Applications made of many small libraries often need each library's one-time
//! initialisation to run only after the libraries it depends on, and only when
//! something actually needs it. `mod_link` schedules those initialisers. The hard
//! part is that initialisation code is not passive: it may register libraries nobody
//! knew about a moment ago, and it may ask for other libraries to be loaded, including
//! ones that depend on the very library being initialised.
//!
//! # Core Concepts
//!
//! - [`Library`]: A named unit with a load target and an ordered list of dependency
//! 	names. Dependencies may name libraries that aren't registered yet.
//!
//! - [`LoadTarget`]: The library's initialisation code. The loader treats it as a black
//! 	box that either succeeds or fails. It receives the [`Loader`] mutably and may
//! 	register libraries or request loads while it runs. [`Initialiser`] wraps a closure.
//!
//! - [`Loader`]: Owns the [`Registry`] and the [`LoadTracker`] and schedules loads.
//! 	There is no global state; every loader is independent.
//!
//! - [`LoadStatus`]: `Unloaded → Loading → Loaded`, never backwards. A library is
//! 	loaded at most once.
//!
//! - **Deferral**: a request that needs a library which is currently `Loading` is queued
//! 	on it and resumed, in FIFO order, as soon as it finishes. No request ever observes
//! 	a half-initialised library.
//!
//! # Example
//!
//! ```
//! use std::cell::RefCell ;
//! use std::rc::Rc ;
//! use mod_link::{ Initialiser, Loader, LoadOutcome };
//!
//! let order = Rc::new( RefCell::new( Vec::<String>::new() ));
//! let log = {
//!     let order = Rc::clone( &order );
//!     move | name: &str | order.borrow_mut().push( name.to_string() )
//! };
//!
//! let mut loader = Loader::<Initialiser<std::io::Error>>::new();
//! let record = log.clone();
//! loader.register( "core", Initialiser::new( move | name, loader | {
//!     record( name );
//!     // Discovered while loading: a plugin that itself depends on "core".
//!     let record = record.clone();
//!     loader.register( "plugin", Initialiser::new( move | name, _ | { record( name ); Ok(()) }), [ "core" ]);
//!     // "core" is still loading, so this is queued until it finishes.
//!     let ( outcome, _ ) = loader.request_load( "plugin" ).unwrap();
//!     assert_eq!( outcome, LoadOutcome::Deferred );
//!     Ok(())
//! }), Vec::<String>::new() );
//!
//! let record = log.clone();
//! loader.register( "app", Initialiser::new( move | name, _ | { record( name ); Ok(()) }), [ "core" ]);
//!
//! let ( outcome, warnings ) = loader.request_load( "app" ).unwrap();
//! assert_eq!( outcome, LoadOutcome::Loaded );
//! assert!( warnings.is_empty() );
//! assert_eq!( *order.borrow(), vec![ "core", "plugin", "app" ]);
//! ```
//!
//! # Errors
//!
//! The error of a request goes to whoever made it. Errors that have no such caller,
//! like a failure in a request that was resumed after its blocker finished, or a
//! request for a library that is never registered, are returned next to the result of
//! the outermost request as a [`PartialResult`]. Load-target failures always reach the
//! outermost request as well, even when a target drops the error of a nested request.
//!
//! # Tracing
//!
//! With [`LoaderConfig::trace_transitions`] enabled (or `MOD_LINK_TRACE` set when using
//! [`LoaderConfig::from_env`]) every state change is emitted as a `tracing` debug event
//! under the `mod_link::transitions` target and passed to the observer installed with
//! [`Loader::with_observer`].

mod config ;
mod dot ;
mod library ;
mod load_error ;
mod load_state ;
mod load_target ;
mod loader ;
mod registry ;
mod transition ;
mod utils ;

#[doc( no_inline )]
pub use nonempty_collections::NEVec ;

pub use config::{ LoaderConfig, TRACE_ENV_VAR };
pub use library::Library ;
pub use load_error::LoadError ;
pub use load_state::{ LoadStatus, LoadTracker, InvalidTransition };
pub use load_target::{ LoadTarget, Initialiser };
pub use loader::{ Loader, LoadOutcome };
pub use registry::Registry ;
pub use transition::Transition ;
pub use utils::{ PartialSuccess, PartialResult };
