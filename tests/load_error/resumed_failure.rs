use mod_link::{ LoadError, LoadOutcome, LoadStatus };
use crate::fixture_loading::Harness ;

#[test]
fn resumed_failure_is_returned_to_the_outermost_caller() {

	let mut harness = Harness::new();
	let waiter = harness.failing( "resumed and failed" );
	let base = harness.fixture().with_action( move | loader | {
		loader.register( "waiter", waiter, [ "base" ]);
		let ( outcome, _ ) = loader.request_load( "waiter" ).unwrap();
		assert_eq!( outcome, LoadOutcome::Deferred );
		Ok(())
	});
	harness.loader.register( "base", base, Vec::<String>::new() );

	let ( outcome, warnings ) = harness.loader.request_load( "base" ).unwrap();

	assert_eq!( outcome, LoadOutcome::Loaded );
	assert_eq!( warnings.len(), 1 );
	assert!( matches!( &warnings[0], LoadError::LoadFailed { library, .. } if library == "waiter" ));
	assert_eq!( harness.loader.status_of( "base" ), LoadStatus::Loaded );
	assert!( harness.loader.is_failed( "waiter" ));

}

#[test]
fn resumed_failure_abandons_requests_behind_it() {

	let mut harness = Harness::new();
	let waiter = harness.failing( "resumed and failed" );
	let behind = harness.fixture();
	let base = harness.fixture().with_action( move | loader | {
		loader.register( "waiter", waiter, [ "base" ]);
		loader.register( "behind", behind, [ "waiter" ]);
		let _ = loader.request_load( "behind" );
		Ok(())
	});
	harness.loader.register( "base", base, Vec::<String>::new() );

	let ( _, warnings ) = harness.loader.request_load( "base" ).unwrap();

	assert_eq!( warnings.len(), 1 );
	assert_eq!( harness.loader.status_of( "behind" ), LoadStatus::Unloaded );
	assert_eq!( harness.loader.tracker().pending_count(), 0 );
	assert!( harness.transcript().contains( &"Abandoning load of behind waiting on waiter".to_string() ));

}
