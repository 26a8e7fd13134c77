//! Per-library load status and deferred-request bookkeeping.
//!
//! The [`LoadTracker`] owns everything about a library that changes while loading:
//! its [`LoadStatus`], whether its load target failed, the queues of requests waiting
//! on it, and the order in which libraries finished loading.

use std::collections::{ HashMap, HashSet, VecDeque };
use indexmap::IndexMap ;
use thiserror::Error ;



/// Load status of a library.
///
/// Transitions are monotonic: `Unloaded → Loading → Loaded`. A library whose load
/// target failed stays `Loading` forever; see [`LoadTracker::is_failed`].
#[derive( Debug, Clone, Copy, PartialEq, Eq, Hash, Default )]
pub enum LoadStatus {
	/// Not yet requested, or requested but waiting on a dependency.
	#[default] Unloaded,
	/// The load target is running (or failed while running).
	Loading,
	/// The load target completed successfully. Terminal.
	Loaded,
}

impl LoadStatus {
	/// Whether the status is [`LoadStatus::Loaded`].
	#[inline] pub fn is_loaded( self ) -> bool { self == Self::Loaded }
}

impl std::fmt::Display for LoadStatus {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		match self {
			Self::Unloaded => write!( f, "unloaded" ),
			Self::Loading => write!( f, "loading" ),
			Self::Loaded => write!( f, "loaded" ),
		}
	}
}

/// A status change that would break monotonicity.
#[derive( Debug, Clone, PartialEq, Eq, Error )]
#[error( "Invalid transition for '{library}': {from} -> {to}" )]
pub struct InvalidTransition {
	/// The library whose status was being changed
	pub library: String,
	/// Status at the time of the call
	pub from: LoadStatus,
	/// Status the caller tried to move to
	pub to: LoadStatus,
}

/// Tracks load status, failures, and deferred requests for every library.
#[derive( Debug, Default )]
pub struct LoadTracker {
	statuses: HashMap<String, LoadStatus>,
	/// Requests keyed by the library they are waiting on, FIFO per key
	pending: IndexMap<String, VecDeque<String>>,
	failed: HashSet<String>,
	load_order: Vec<String>,
}

impl LoadTracker {

	/// Creates an empty tracker.
	pub fn new() -> Self { Self::default() }

	/// Status of `name`. Names that were never touched are [`LoadStatus::Unloaded`].
	#[inline] pub fn status_of( &self, name: &str ) -> LoadStatus {
		self.statuses.get( name ).copied().unwrap_or_default()
	}

	/// Whether the load target of `name` reported failure.
	#[inline] pub fn is_failed( &self, name: &str ) -> bool { self.failed.contains( name ) }

	/// Names of loaded libraries in the order they finished loading.
	#[inline] pub fn load_order( &self ) -> &[String] { &self.load_order }

	/// Number of requests currently waiting on some other library.
	pub fn pending_count( &self ) -> usize { self.pending.values().map( VecDeque::len ).sum() }

	/// Requests queued against `blocker`, in the order they will be resumed.
	pub fn queued_on( &self, blocker: &str ) -> impl Iterator<Item = &str> {
		self.pending.get( blocker ).into_iter().flatten().map( String::as_str )
	}

	/// Moves `name` from `Unloaded` to `Loading`.
	///
	/// # Errors
	/// Returns [`InvalidTransition`] if `name` is not `Unloaded`.
	pub fn mark_loading( &mut self, name: &str ) -> Result<(), InvalidTransition> {
		self.transition( name, LoadStatus::Unloaded, LoadStatus::Loading )
	}

	/// Moves `name` from `Loading` to `Loaded` and hands back the requests that were
	/// waiting on it, clearing its queue.
	///
	/// # Errors
	/// Returns [`InvalidTransition`] if `name` is not `Loading`, or if it has failed.
	pub fn mark_loaded( &mut self, name: &str ) -> Result<VecDeque<String>, InvalidTransition> {
		if self.is_failed( name ) { return Err( InvalidTransition {
			library: name.to_string(),
			from: LoadStatus::Loading,
			to: LoadStatus::Loaded,
		})}
		self.transition( name, LoadStatus::Loading, LoadStatus::Loaded )?;
		self.load_order.push( name.to_string() );
		Ok( self.pending.shift_remove( name ).unwrap_or_default() )
	}

	/// Records that the load target of `name` failed.
	///
	/// The status stays `Loading`. Every request queued on `name`, directly or behind
	/// another queued request, is dropped and returned with its blocker; none of them
	/// will ever resume.
	///
	/// # Errors
	/// Returns [`InvalidTransition`] if `name` is not `Loading`.
	pub fn mark_failed( &mut self, name: &str ) -> Result<Vec<( String, String )>, InvalidTransition> {
		match self.status_of( name ) {
			LoadStatus::Loading => {
				self.failed.insert( name.to_string() );
				Ok( self.take_queued_behind([ name ]))
			},
			from => Err( InvalidTransition { library: name.to_string(), from, to: LoadStatus::Loading }),
		}
	}

	/// Queues a request for `name` until `blocker` finishes loading.
	///
	/// A name is queued at most once per blocker. Returns whether it was newly queued.
	pub fn defer( &mut self, name: &str, blocker: &str ) -> bool {
		let queue = self.pending.entry( blocker.to_string() ).or_default();
		if queue.iter().any(| queued | queued == name ) { return false }
		queue.push_back( name.to_string() );
		true
	}

	/// Removes and returns every request waiting on any of `roots`, following the
	/// chain of requests waiting on those requests. Each entry is paired with the
	/// library it was queued on. Roots themselves are not returned.
	pub fn take_queued_behind<'a>( &mut self, roots: impl IntoIterator<Item = &'a str> ) -> Vec<( String, String )> {
		let mut visited = HashSet::new();
		let mut frontier = roots.into_iter()
			.inspect(| root | { visited.insert( root.to_string() ); })
			.map( str::to_string )
			.collect::<VecDeque<_>>();
		let mut taken = Vec::new();
		while let Some( blocker ) = frontier.pop_front() {
			let Some( queue ) = self.pending.shift_remove( &blocker ) else { continue };
			queue.into_iter()
				.filter(| name | visited.insert( name.clone() ))
				.for_each(| name | {
					taken.push(( name.clone(), blocker.clone() ));
					frontier.push_back( name );
				});
		}
		taken
	}

	fn transition( &mut self, name: &str, from: LoadStatus, to: LoadStatus ) -> Result<(), InvalidTransition> {
		match self.status_of( name ) {
			current if current == from => {
				self.statuses.insert( name.to_string(), to );
				Ok(())
			},
			current => Err( InvalidTransition { library: name.to_string(), from: current, to }),
		}
	}

}

#[cfg( test )]
mod tests {
	use super::* ;

	#[test]
	fn statuses_only_move_forward() {
		let mut tracker = LoadTracker::new();
		assert_eq!( tracker.status_of( "a" ), LoadStatus::Unloaded );
		assert!( tracker.mark_loaded( "a" ).is_err() );

		tracker.mark_loading( "a" ).unwrap();
		assert_eq!( tracker.status_of( "a" ), LoadStatus::Loading );
		assert_eq!(
			tracker.mark_loading( "a" ),
			Err( InvalidTransition { library: "a".into(), from: LoadStatus::Loading, to: LoadStatus::Loading }),
		);

		tracker.mark_loaded( "a" ).unwrap();
		assert_eq!( tracker.status_of( "a" ), LoadStatus::Loaded );
		assert!( tracker.mark_loading( "a" ).is_err() );
		assert!( tracker.mark_loaded( "a" ).is_err() );
		assert_eq!( tracker.load_order(), &[ "a".to_string() ]);
	}

	#[test]
	fn mark_loaded_drains_queue_in_fifo_order() {
		let mut tracker = LoadTracker::new();
		tracker.mark_loading( "a" ).unwrap();
		assert!( tracker.defer( "c", "a" ));
		assert!( tracker.defer( "b", "a" ));
		assert!( !tracker.defer( "c", "a" ));
		assert_eq!( tracker.pending_count(), 2 );
		assert_eq!( tracker.queued_on( "a" ).collect::<Vec<_>>(), vec![ "c", "b" ]);

		let resumed = tracker.mark_loaded( "a" ).unwrap();
		assert_eq!( resumed, VecDeque::from([ "c".to_string(), "b".to_string() ]));
		assert_eq!( tracker.pending_count(), 0 );
	}

	#[test]
	fn failure_abandons_transitive_waiters() {
		let mut tracker = LoadTracker::new();
		tracker.mark_loading( "a" ).unwrap();
		tracker.defer( "a", "a" );
		tracker.defer( "b", "a" );
		tracker.defer( "c", "b" );
		tracker.defer( "d", "c" );
		tracker.defer( "unrelated", "x" );

		let abandoned = tracker.mark_failed( "a" ).unwrap();
		assert_eq!( abandoned, vec![
			( "b".to_string(), "a".to_string() ),
			( "c".to_string(), "b".to_string() ),
			( "d".to_string(), "c".to_string() ),
		]);
		assert!( tracker.is_failed( "a" ));
		assert_eq!( tracker.status_of( "a" ), LoadStatus::Loading );
		assert!( tracker.mark_loaded( "a" ).is_err() );
		assert_eq!( tracker.queued_on( "x" ).collect::<Vec<_>>(), vec![ "unrelated" ]);
	}

	#[test]
	fn only_loading_libraries_can_fail() {
		let mut tracker = LoadTracker::new();
		assert!( tracker.mark_failed( "a" ).is_err() );
		assert!( !tracker.is_failed( "a" ));
	}
}
