//! Graphviz rendering of the dependency graph.
//!
//! Edges point from a library to each of its dependencies. Dependencies that were
//! never registered are drawn dashed.

use std::fmt::Write ;
use itertools::Itertools ;

use crate::load_state::{ LoadStatus, LoadTracker };
use crate::registry::Registry ;



pub(crate) fn render<T>( registry: &Registry<T>, tracker: &LoadTracker, out: &mut impl Write ) -> std::fmt::Result {

	writeln!( out, "digraph Libraries {{" )?;
	writeln!( out, "\tnode [shape=box];" )?;

	for library in registry.iter() {
		let name = library.name();
		writeln!( out, "\t\"{}\" [{}];", escape( name ), node_style( tracker, name ))?;
	}

	let unregistered = registry.iter()
		.flat_map(| library | library.dependencies() )
		.filter(| dependency | !registry.contains( dependency ))
		.unique()
		.collect_vec();
	for dependency in unregistered {
		writeln!( out, "\t\"{}\" [style=dashed];", escape( dependency ))?;
	}

	for library in registry.iter() {
		for dependency in library.dependencies() {
			writeln!( out, "\t\"{}\" -> \"{}\";", escape( library.name() ), escape( dependency ))?;
		}
	}

	writeln!( out, "}}" )

}

fn node_style( tracker: &LoadTracker, name: &str ) -> &'static str {
	match tracker.status_of( name ) {
		_ if tracker.is_failed( name ) => "color=red",
		LoadStatus::Loaded => "style=filled",
		LoadStatus::Loading => "style=bold",
		LoadStatus::Unloaded => "style=solid",
	}
}

fn escape( name: &str ) -> String { name.replace( '\\', "\\\\" ).replace( '"', "\\\"" )}

#[cfg( test )]
mod tests {
	use super::* ;
	use crate::library::Library ;

	#[test]
	fn renders_nodes_edges_and_forward_references() {
		let mut registry = Registry::new();
		registry.insert( Library::new( "a", (), Vec::<String>::new() ));
		registry.insert( Library::new( "b", (), [ "a", "later" ]));
		registry.insert( Library::new( "c", (), [ "later" ]));

		let mut tracker = LoadTracker::new();
		tracker.mark_loading( "a" ).unwrap();
		tracker.mark_loaded( "a" ).unwrap();

		let mut out = String::new();
		render( &registry, &tracker, &mut out ).unwrap();

		assert_eq!( out, concat!(
			"digraph Libraries {\n",
			"\tnode [shape=box];\n",
			"\t\"a\" [style=filled];\n",
			"\t\"b\" [style=solid];\n",
			"\t\"c\" [style=solid];\n",
			"\t\"later\" [style=dashed];\n",
			"\t\"b\" -> \"a\";\n",
			"\t\"b\" -> \"later\";\n",
			"\t\"c\" -> \"later\";\n",
			"}\n",
		));
	}

	#[test]
	fn quotes_are_escaped() {
		assert_eq!( escape( r#"odd"name"# ), r#"odd\"name"# );
	}
}
