use mod_link::{ LoadError, LoadStatus };
use crate::fixture_loading::Harness ;

#[test]
fn dependency_cycle_between_two_libraries() {

	let mut harness = Harness::new();
	libraries!( harness, {
		"A" => [ "B" ],
		"B" => [ "A" ],
	});

	let ( err, warnings ) = harness.loader.request_load( "A" ).unwrap_err();
	assert_no_warnings!( warnings );

	match err {
		LoadError::DependencyCycle( path ) => assert_eq!( path, vec![ "A", "B", "A" ]),
		err => panic!( "Expected DependencyCycle, found {:?}", err ),
	}
	assert!( harness.invoked().is_empty() );
	assert_eq!( harness.loader.status_of( "A" ), LoadStatus::Unloaded );
	assert_eq!( harness.loader.status_of( "B" ), LoadStatus::Unloaded );

}

#[test]
fn dependency_cycle_on_itself() {

	let mut harness = Harness::new();
	libraries!( harness, { "loop" => [ "loop" ] });

	let ( err, _ ) = harness.loader.request_load( "loop" ).unwrap_err();
	assert_eq!( err.to_string(), "Dependency cycle detected: loop -> loop" );

}

#[test]
fn dependency_cycle_path_excludes_the_entry_point() {

	let mut harness = Harness::new();
	libraries!( harness, {
		"root" => [ "A" ],
		"A" => [ "B" ],
		"B" => [ "C" ],
		"C" => [ "A" ],
	});

	let ( err, _ ) = harness.loader.request_load( "root" ).unwrap_err();
	assert!( matches!( err, LoadError::DependencyCycle( ref path ) if *path == [ "A", "B", "C", "A" ]));

}

#[test]
fn dependency_cycle_through_a_dynamic_request_is_not_an_error() {

	// "A" asks for "B" while loading and "B" depends on "A"; the request is deferred instead.
	let mut harness = Harness::new();
	let a = harness.fixture().with_action(| loader | {
		loader.request_load( "B" ).map_err(|( err, _ )| crate::fixture_loading::FixtureError( err.to_string() ))?;
		Ok(())
	});
	harness.loader.register( "A", a, Vec::<String>::new() );
	libraries!( harness, { "B" => [ "A" ] });

	let ( _, warnings ) = harness.loader.request_load( "A" ).unwrap();
	assert_no_warnings!( warnings );
	assert_eq!( harness.invoked(), vec![ "A", "B" ]);

}
