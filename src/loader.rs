//! The load scheduler.
//!
//! [`Loader`] owns the [`Registry`] and [`LoadTracker`] and decides when each load
//! target may run. Loading is demand-driven and single-threaded: a request walks the
//! library's dependencies depth-first, loads them, then runs the library's own target.
//! A request that can't proceed because something it needs is still loading is queued
//! on that library and driven again from the frame that finishes it.

use std::sync::Arc ;
use indexmap::IndexSet ;
use itertools::Itertools ;
use nonempty_collections::NEVec ;
use pipe_trait::Pipe ;

use crate::config::LoaderConfig ;
use crate::library::Library ;
use crate::registry::Registry ;
use crate::load_error::{ LoadError, without_reported };
use crate::load_state::{ LoadStatus, LoadTracker };
use crate::load_target::LoadTarget ;
use crate::transition::Transition ;
use crate::utils::{ Merge, PartialResult, PartialSuccess };



/// How a request ended.
#[derive( Debug, Clone, Copy, PartialEq, Eq )]
pub enum LoadOutcome {
	/// The library finished loading while handling this request.
	Loaded,
	/// The library had already finished loading; nothing ran.
	AlreadyLoaded,
	/// Something the library needs is still loading. The request is queued and will
	/// be resumed when it finishes.
	Deferred,
}

type Observer = Box<dyn FnMut( &Transition )> ;

/// Names requested while unregistered, and the requests stuck behind them.
struct Unresolved {
	missing: Vec<String>,
	stalled: Vec<String>,
}

impl Unresolved {
	fn involves( &self, name: &str ) -> bool {
		self.missing.iter().chain( &self.stalled ).any(| other | other == name )
	}

	fn into_error<E: std::error::Error + 'static>( self ) -> Option<LoadError<E>> {
		let mut missing = self.missing.into_iter();
		let mut names = NEVec::new( missing.next()? );
		missing.for_each(| name | names.push( name ));
		Some( LoadError::UnknownLibrary { missing: names, stalled: self.stalled })
	}
}

/// A dependency-ordered, lazy library loader.
///
/// Libraries are declared with [`register`]( Self::register ) and loaded on demand with
/// [`request_load`]( Self::request_load ). Load targets receive the loader mutably, so
/// initialisation code may register more libraries and request further loads; such
/// nested requests are scheduled by the same algorithm.
///
/// Guarantees:
/// - a load target runs at most once, and never while its library is already `Loading`
/// - every dependency declared when a library starts loading is `Loaded` first
/// - requests for a library that is currently loading are queued, not rejected
///
/// # Example
///
/// ```
/// use std::cell::RefCell ;
/// use std::rc::Rc ;
/// use mod_link::{ Initialiser, Loader };
///
/// let order = Rc::new( RefCell::new( Vec::new() ));
/// let record = | name: &'static str | {
///     let order = Rc::clone( &order );
///     Initialiser::<std::io::Error>::new( move | _, _ | { order.borrow_mut().push( name ); Ok(()) })
/// };
///
/// let mut loader = Loader::new();
/// loader.register( "A", record( "A" ), Vec::<String>::new() );
/// loader.register( "B", record( "B" ), [ "A" ]);
/// loader.register( "C", record( "C" ), [ "A" ]);
///
/// let ( _outcome, warnings ) = loader.request_load( "B" ).unwrap();
/// assert!( warnings.is_empty() );
/// assert_eq!( *order.borrow(), vec![ "A", "B" ]);
/// ```
pub struct Loader<T: LoadTarget> {
	registry: Registry<T>,
	tracker: LoadTracker,
	config: LoaderConfig,
	observer: Option<Observer>,
	/// Libraries whose dependencies are being walked in the current load context
	walk_stack: Vec<String>,
	/// Names requested before anything registered them
	unresolved: IndexSet<String>,
	/// Errors without a direct caller, handed to the outermost request
	orphaned_errors: Vec<LoadError<T::Error>>,
	/// Load-target failures raised during the current pass
	failures: Vec<LoadError<T::Error>>,
	/// Nesting depth of public requests; 0 outside of any pass
	depth: usize,
}

impl<T: LoadTarget> Default for Loader<T> {
	fn default() -> Self { Self::with_config( LoaderConfig::default() )}
}

impl<T: LoadTarget> Loader<T> {

	/// Creates an empty loader with default configuration.
	pub fn new() -> Self { Self::default() }

	/// Creates an empty loader.
	pub fn with_config( config: LoaderConfig ) -> Self {
		Self {
			registry: Registry::new(),
			tracker: LoadTracker::new(),
			config,
			observer: None,
			walk_stack: Vec::new(),
			unresolved: IndexSet::new(),
			orphaned_errors: Vec::new(),
			failures: Vec::new(),
			depth: 0,
		}
	}

	/// Installs a sink that receives every [`Transition`].
	///
	/// Transitions are only produced while [`LoaderConfig::trace_transitions`] is enabled.
	pub fn with_observer( mut self, observer: impl FnMut( &Transition ) + 'static ) -> Self {
		self.observer = Some( Box::new( observer ));
		self
	}

	/// Active configuration.
	#[inline] pub fn config( &self ) -> &LoaderConfig { &self.config }

	/// Every library registered so far.
	#[inline] pub fn registry( &self ) -> &Registry<T> { &self.registry }

	/// Load status and queued requests.
	#[inline] pub fn tracker( &self ) -> &LoadTracker { &self.tracker }

	/// Load status of `name`.
	#[inline] pub fn status_of( &self, name: &str ) -> LoadStatus { self.tracker.status_of( name ) }

	/// Whether the load target of `name` failed.
	#[inline] pub fn is_failed( &self, name: &str ) -> bool { self.tracker.is_failed( name ) }

	/// Names of loaded libraries in the order they finished loading.
	#[inline] pub fn loaded_libraries( &self ) -> &[String] { self.tracker.load_order() }

	/// Declares a library, or replaces an earlier declaration with the same name.
	///
	/// Never triggers a load. Dependencies may name libraries that aren't registered yet.
	///
	/// Replacing a library that is already loading or loaded has no effect on that load:
	/// the dependencies captured when loading began stay authoritative, and a loaded
	/// library is never loaded again. A loading library re-registered with different
	/// dependencies is logged as a warning.
	pub fn register(
		&mut self,
		name: impl Into<String>,
		target: T,
		dependencies: impl IntoIterator<Item = impl Into<String>>,
	) {
		let library = Library::new( name, target, dependencies );
		let name = library.name().to_string();
		let dependencies = library.dependencies().to_vec();

		let Some( previous ) = self.registry.insert( library ) else { return };
		if previous == dependencies { return }

		match self.tracker.status_of( &name ) {
			LoadStatus::Loading => tracing::warn!(
				library = %name, ?previous, ?dependencies,
				"Library re-registered with different dependencies while loading; the load in progress keeps the original dependencies"
			),
			LoadStatus::Loaded => tracing::debug!(
				library = %name, ?previous, ?dependencies,
				"Library re-registered after loading; new dependencies are not loaded retroactively"
			),
			LoadStatus::Unloaded => {},
		}
	}

	/// Loads `name` and, first, everything it depends on.
	///
	/// Safe to call redundantly: once a library is loaded, further requests do nothing.
	/// When called from inside a load target, a request that can't proceed yet returns
	/// [`LoadOutcome::Deferred`] and is completed later in the same pass.
	///
	/// # Partial Success
	/// The outermost call also returns every load-target failure of the pass, including
	/// those first returned to a load target that made a nested request, along with the
	/// errors that had no direct caller: failures of requests resumed after their blocker
	/// finished, and [`LoadError::UnknownLibrary`] for requests that can never resolve.
	/// A failure already returned as the primary error isn't repeated. Nested calls leave
	/// all of these to the outermost one.
	///
	/// # Errors
	/// - [`LoadError::LoadFailed`] when the load target of `name` or one of its
	/// 	dependencies fails
	/// - [`LoadError::AlreadyFailed`] / [`LoadError::DependencyFailed`] when a previous
	/// 	failure blocks the load
	/// - [`LoadError::DependencyCycle`] for cyclic declared dependencies
	/// - [`LoadError::UnknownLibrary`] when `name` waits on a name that is never registered
	pub fn request_load( &mut self, name: &str ) -> PartialResult<LoadOutcome, LoadError<T::Error>> {
		self.depth += 1 ;
		let result = self.drive( name );
		self.depth -= 1 ;

		if self.depth > 0 { return match result {
			Ok( outcome ) => Ok(( outcome, Vec::with_capacity( 0 ))),
			Err( err ) => Err(( err, Vec::with_capacity( 0 ))),
		}}

		let ( unresolved, errors ) = self.settle();
		let result = match result {
			Ok( LoadOutcome::Deferred ) if self.status_of( name ).is_loaded() => Ok( LoadOutcome::Loaded ),
			result => result,
		};

		match ( result, unresolved ) {
			( Ok( LoadOutcome::Deferred ), Some( unresolved )) if unresolved.involves( name ) => match unresolved.into_error() {
				Some( err ) => Err(( err, errors )),
				None => Ok(( LoadOutcome::Deferred, errors )),
			},
			( Ok( outcome ), unresolved ) => Ok(( outcome, errors.merge_all( unresolved.and_then( Unresolved::into_error )))),
			( Err( err ), unresolved ) => {
				let errors = without_reported( errors, std::slice::from_ref( &err ));
				Err(( err, errors.merge_all( unresolved.and_then( Unresolved::into_error ))))
			},
		}
	}

	/// Requests every library registered at call time whose name starts with `prefix`.
	///
	/// An empty prefix requests everything. Libraries are requested in registration
	/// order within a single pass, so queued requests resolve before this returns.
	///
	/// Returns the names that finished loading during the call, in load order, together
	/// with every error encountered.
	pub fn request_load_all( &mut self, prefix: &str ) -> PartialSuccess<Vec<String>, LoadError<T::Error>> {
		let loaded_before = self.tracker.load_order().len();
		let names = self.registry.names()
			.filter(| name | name.starts_with( prefix ))
			.map( str::to_string )
			.collect_vec();

		self.depth += 1 ;
		let errors = names.iter()
			.filter_map(| name | self.drive( name ).err() )
			.collect_vec();
		self.depth -= 1 ;

		let errors = match self.depth {
			0 => self.settle().pipe(|( unresolved, side )| {
				let side = without_reported( side, &errors );
				errors.merge_all( side ).merge_all( unresolved.and_then( Unresolved::into_error ))
			}),
			_ => errors,
		};

		( self.tracker.load_order()[loaded_before..].to_vec(), errors )
	}

	/// Graphviz rendering of the registered dependency graph, annotated with load status.
	pub fn dot_graph( &self ) -> String {
		let mut out = String::new();
		// Writing into a `String` can't fail.
		let _ = crate::dot::render( &self.registry, &self.tracker, &mut out );
		out
	}

	/// Writes [`dot_graph`]( Self::dot_graph ) to `writer`.
	///
	/// # Errors
	/// Propagates I/O errors from `writer`.
	pub fn write_dot( &self, mut writer: impl std::io::Write ) -> std::io::Result<()> {
		writer.write_all( self.dot_graph().as_bytes() )
	}

	/// Drives a single request; on failure drops everything queued behind it.
	fn drive( &mut self, name: &str ) -> Result<LoadOutcome, LoadError<T::Error>> {
		let result = self.drive_unchecked( name );
		if result.is_err() { self.abandon_queued_behind( name ); }
		result
	}

	fn drive_unchecked( &mut self, name: &str ) -> Result<LoadOutcome, LoadError<T::Error>> {

		self.emit(|| Transition::Requested( name.to_string() ));

		if let Some( settled ) = self.check_settled( name ) { return settled }

		let Some( library ) = self.registry.lookup( name ) else {
			// Registering it later in this pass is still legal; checked when the pass ends.
			self.unresolved.insert( name.to_string() );
			return Ok( LoadOutcome::Deferred );
		};
		self.unresolved.shift_remove( name );

		if let Some( position ) = self.walk_stack.iter().position(| walking | walking == name ) {
			return Err( LoadError::DependencyCycle(
				self.walk_stack[position..].iter().cloned().chain( std::iter::once( name.to_string() )).collect()
			));
		}

		let dependencies = library.dependencies().to_vec();
		self.walk_stack.push( name.to_string() );
		let walked = self.walk_dependencies( name, &dependencies );
		self.walk_stack.pop();

		match walked? {
			Some( blocker ) => {
				self.defer( name, &blocker );
				Ok( LoadOutcome::Deferred )
			},
			None => self.load( name ),
		}

	}

	/// Settles requests that need no walk: loaded, failed, or currently loading.
	fn check_settled( &mut self, name: &str ) -> Option<Result<LoadOutcome, LoadError<T::Error>>> {
		match self.tracker.status_of( name ) {
			LoadStatus::Unloaded => None,
			LoadStatus::Loaded => Some( Ok( LoadOutcome::AlreadyLoaded )),
			LoadStatus::Loading if self.tracker.is_failed( name ) => Some( Err( LoadError::AlreadyFailed( name.to_string() ))),
			LoadStatus::Loading => {
				// Re-entrant request; the load in progress resumes it when it finishes.
				self.defer( name, name );
				Some( Ok( LoadOutcome::Deferred ))
			},
		}
	}

	/// Walks dependencies in declared order, loading what it can.
	///
	/// Returns the first dependency that isn't loaded yet, if any.
	fn walk_dependencies( &mut self, name: &str, dependencies: &[String] ) -> Result<Option<String>, LoadError<T::Error>> {
		for dependency in dependencies {
			match self.tracker.status_of( dependency ) {
				LoadStatus::Loaded => {},
				LoadStatus::Loading if self.tracker.is_failed( dependency ) => return Err( LoadError::DependencyFailed {
					library: name.to_string(),
					dependency: dependency.clone(),
				}),
				LoadStatus::Loading => return Ok( Some( dependency.clone() )),
				LoadStatus::Unloaded => {
					self.drive( dependency )?;
					if !self.tracker.status_of( dependency ).is_loaded() { return Ok( Some( dependency.clone() )) }
				},
			}
		}
		Ok( None )
	}

	/// Runs the load target of `name` and resumes everything that was waiting on it.
	fn load( &mut self, name: &str ) -> Result<LoadOutcome, LoadError<T::Error>> {

		// A resumed request may have completed this library while its dependencies were walked.
		if let Some( settled ) = self.check_settled( name ) { return settled.map(| outcome | match outcome {
			LoadOutcome::AlreadyLoaded => LoadOutcome::Loaded,
			outcome => outcome,
		})}

		self.tracker.mark_loading( name )?;
		self.emit(|| Transition::Loading( name.to_string() ));

		let target = self.registry.lookup_mut( name ).and_then( Library::take_target );

		// Requests made by the target, and the requests it resumes, start a new walk.
		let outer_walk = std::mem::take( &mut self.walk_stack );
		let result = self.run_target( name, target );
		self.walk_stack = outer_walk ;

		result

	}

	fn run_target( &mut self, name: &str, target: Option<T> ) -> Result<LoadOutcome, LoadError<T::Error>> {

		let result = match target {
			Some( target ) => target.load( name, self ),
			None => {
				tracing::debug!( library = %name, "No load target to run" );
				Ok(())
			},
		};

		if let Err( source ) = result {
			let abandoned = self.tracker.mark_failed( name )?;
			tracing::warn!( library = %name, error = %source, abandoned = abandoned.len(), "Load target failed" );
			self.emit(|| Transition::Failed( name.to_string() ));
			abandoned.into_iter().for_each(| ( library, blocker ) | self.emit(|| Transition::Abandoned { library, blocker }));
			let source = Arc::new( source );
			self.failures.push( LoadError::LoadFailed { library: name.to_string(), source: Arc::clone( &source )});
			return Err( LoadError::LoadFailed { library: name.to_string(), source });
		}

		let waiting = self.tracker.mark_loaded( name )?;
		self.emit(|| Transition::Loaded( name.to_string() ));

		waiting.into_iter()
			.filter(| waiting | waiting != name )
			.for_each(| waiting | {
				self.emit(|| Transition::Resumed( waiting.clone() ));
				if let Err( err ) = self.drive( &waiting ) { self.orphan( err ); }
			});

		Ok( LoadOutcome::Loaded )

	}

	fn defer( &mut self, name: &str, blocker: &str ) {
		if self.tracker.defer( name, blocker ) {
			self.emit(|| Transition::Deferred { library: name.to_string(), blocker: blocker.to_string() });
		}
	}

	/// Keeps an error for the outermost request. Load-target failures are already
	/// recorded where they were raised.
	fn orphan( &mut self, err: LoadError<T::Error> ) {
		if err.failed_library().is_none() { self.orphaned_errors.push( err ) }
	}

	fn abandon_queued_behind( &mut self, name: &str ) {
		self.tracker.take_queued_behind([ name ])
			.into_iter()
			.for_each(|( library, blocker )| self.emit(|| Transition::Abandoned { library, blocker }));
	}

	/// Ends a pass: drives names registered since they were requested, then reports
	/// whatever is still unresolved along with the errors that had no direct caller.
	fn settle( &mut self ) -> ( Option<Unresolved>, Vec<LoadError<T::Error>> ) {

		self.depth += 1 ;
		loop {
			let registered = self.unresolved.iter()
				.filter(| name | self.registry.contains( name ))
				.cloned()
				.collect_vec();
			if registered.is_empty() { break }
			registered.into_iter().for_each(| name | {
				self.unresolved.shift_remove( &name );
				self.emit(|| Transition::Resumed( name.clone() ));
				if let Err( err ) = self.drive( &name ) { self.orphan( err ); }
			});
		}
		self.depth -= 1 ;

		let errors = std::mem::take( &mut self.failures ).merge_all( std::mem::take( &mut self.orphaned_errors ));
		if self.unresolved.is_empty() { return ( None, errors ) }

		let missing = std::mem::take( &mut self.unresolved ).into_iter().collect_vec();
		let stalled = self.tracker.take_queued_behind( missing.iter().map( String::as_str ))
			.into_iter()
			.map(|( library, blocker )| {
				self.emit(|| Transition::Abandoned { library: library.clone(), blocker });
				library
			})
			.collect_vec();
		tracing::warn!( ?missing, ?stalled, "Requested libraries were never registered" );

		( Some( Unresolved { missing, stalled }), errors )

	}

	fn emit( &mut self, transition: impl FnOnce() -> Transition ) {
		if !self.config.trace_transitions() { return }
		let transition = transition();
		tracing::debug!( target: "mod_link::transitions", library = transition.library(), "{}", transition );
		if let Some( observer ) = self.observer.as_mut() { observer( &transition ) }
	}

}

impl<T: LoadTarget + std::fmt::Debug> std::fmt::Debug for Loader<T> {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "Loader" )
			.field( "registry", &self.registry )
			.field( "tracker", &self.tracker )
			.field( "config", &self.config )
			.field( "observer", &self.observer.as_ref().map(| _ | "<closure>" ))
			.field( "walk_stack", &self.walk_stack )
			.field( "unresolved", &self.unresolved )
			.finish_non_exhaustive()
	}
}
