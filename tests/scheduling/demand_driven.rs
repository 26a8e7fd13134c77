use mod_link::LoadStatus ;
use crate::fixture_loading::Harness ;

#[test]
fn scheduling_demand_driven_registration_never_loads() {

	let mut harness = Harness::new();
	libraries!( harness, {
		"A" => [],
		"B" => [ "A" ],
	});

	assert!( harness.invoked().is_empty() );
	assert!( harness.transitions.borrow().is_empty() );
	assert_eq!( harness.loader.status_of( "A" ), LoadStatus::Unloaded );

}

#[test]
fn scheduling_demand_driven_independent_library_is_not_touched() {

	let mut harness = Harness::new();
	libraries!( harness, {
		"LoadsUnknown" => [],
		"Test" => [ "LoadsUnknown" ],
	});
	// Sorts first and would fail, but nothing depends on it.
	let failing = harness.failing( "should never run" );
	harness.loader.register( "AAA_RaisesError", failing, Vec::<String>::new() );

	let ( _, warnings ) = harness.loader.request_load( "Test" ).unwrap();
	assert_no_warnings!( warnings );

	assert_eq!( harness.invocations( "AAA_RaisesError" ), 0 );
	assert_eq!( harness.loader.status_of( "AAA_RaisesError" ), LoadStatus::Unloaded );
	assert!( !harness.loader.is_failed( "AAA_RaisesError" ));

}
