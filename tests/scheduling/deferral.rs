use mod_link::{ LoadOutcome, LoadStatus };
use crate::fixture_loading::Harness ;

#[test]
fn scheduling_deferral_dependent_registered_during_load() {

	let mut harness = Harness::new();
	let c = harness.fixture();
	let outcome = std::rc::Rc::new( std::cell::Cell::new( None ));
	let seen = std::rc::Rc::clone( &outcome );
	let a = harness.fixture().with_action( move | loader | {
		loader.register( "C", c, [ "A" ]);
		let ( result, warnings ) = loader.request_load( "C" ).unwrap();
		assert_no_warnings!( warnings );
		seen.set( Some( result ));
		Ok(())
	});
	harness.loader.register( "A", a, Vec::<String>::new() );
	libraries!( harness, { "B" => [ "A" ] });

	let ( result, warnings ) = harness.loader.request_load( "B" ).unwrap();
	assert_no_warnings!( warnings );

	assert_eq!( result, LoadOutcome::Loaded );
	assert_eq!( outcome.get(), Some( LoadOutcome::Deferred ));
	assert_eq!( harness.invoked(), vec![ "A", "C", "B" ]);
	assert_eq!( harness.transcript(), vec![
		"Request to load B",
		"Request to load A",
		"Loading A",
		"Request to load C",
		"Deferring load of C until A is loaded",
		"Loaded A",
		"Resuming deferred load of C",
		"Request to load C",
		"Loading C",
		"Loaded C",
		"Loading B",
		"Loaded B",
	]);

}

#[test]
fn scheduling_deferral_reentrant_request_for_loading_library() {

	let mut harness = Harness::new();
	let outcome = std::rc::Rc::new( std::cell::Cell::new( None ));
	let seen = std::rc::Rc::clone( &outcome );
	let a = harness.fixture().with_action( move | loader | {
		let ( result, _ ) = loader.request_load( "A" ).unwrap();
		seen.set( Some( result ));
		Ok(())
	});
	harness.loader.register( "A", a, Vec::<String>::new() );

	let ( result, warnings ) = harness.loader.request_load( "A" ).unwrap();
	assert_no_warnings!( warnings );

	assert_eq!( result, LoadOutcome::Loaded );
	assert_eq!( outcome.get(), Some( LoadOutcome::Deferred ));
	assert_eq!( harness.invocations( "A" ), 1 );
	assert_eq!( harness.loader.tracker().pending_count(), 0 );

}

#[test]
fn scheduling_deferral_load_requests_every_library() {

	// Loading "LoadsAll" asks for everything, including libraries that depend on it.
	let mut harness = Harness::new();
	let loads_all = harness.fixture().with_action(| loader | {
		let ( _, warnings ) = loader.request_load_all( "" );
		assert_no_warnings!( warnings );
		Ok(())
	});
	harness.loader.register( "LoadsAll", loads_all, Vec::<String>::new() );
	libraries!( harness, {
		"DepLoadsAll" => [ "LoadsAll" ],
		"Other" => [ "LoadsAll" ],
	});

	let ( result, warnings ) = harness.loader.request_load( "DepLoadsAll" ).unwrap();
	assert_no_warnings!( warnings );

	assert_eq!( result, LoadOutcome::Loaded );
	assert_eq!( harness.invoked(), vec![ "LoadsAll", "DepLoadsAll", "Other" ]);
	assert!([ "LoadsAll", "DepLoadsAll", "Other" ].iter().all(| name | harness.invocations( name ) == 1 ));
	assert_eq!( harness.loader.status_of( "Other" ), LoadStatus::Loaded );

}

#[test]
fn scheduling_deferral_resumes_in_fifo_order() {

	let mut harness = Harness::new();
	let base = harness.fixture().with_action(| loader | {
		for name in [ "third", "first", "second" ] {
			let ( result, _ ) = loader.request_load( name ).unwrap();
			assert_eq!( result, LoadOutcome::Deferred );
		}
		assert_eq!( loader.tracker().queued_on( "base" ).collect::<Vec<_>>(), vec![ "third", "first", "second" ]);
		Ok(())
	});
	harness.loader.register( "base", base, Vec::<String>::new() );
	libraries!( harness, {
		"first" => [ "base" ],
		"second" => [ "base" ],
		"third" => [ "base" ],
	});

	let ( _, warnings ) = harness.loader.request_load( "base" ).unwrap();
	assert_no_warnings!( warnings );

	assert_eq!( harness.invoked(), vec![ "base", "third", "first", "second" ]);

}

#[test]
fn scheduling_deferral_chained_behind_transitive_dependency() {

	// "top" waits on "middle", which itself waits on the library being loaded.
	let mut harness = Harness::new();
	let base = harness.fixture().with_action(| loader | {
		let ( result, _ ) = loader.request_load( "top" ).unwrap();
		assert_eq!( result, LoadOutcome::Deferred );
		assert_eq!( loader.tracker().queued_on( "middle" ).collect::<Vec<_>>(), vec![ "top" ]);
		Ok(())
	});
	harness.loader.register( "base", base, Vec::<String>::new() );
	libraries!( harness, {
		"middle" => [ "base" ],
		"top" => [ "middle" ],
	});

	let ( _, warnings ) = harness.loader.request_load( "base" ).unwrap();
	assert_no_warnings!( warnings );

	assert_eq!( harness.invoked(), vec![ "base", "middle", "top" ]);
	assert_eq!( harness.loader.tracker().pending_count(), 0 );

}
