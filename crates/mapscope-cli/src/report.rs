use colored::Colorize;

use mapscope_graph::GraphElement;
use mapscope_model::NormalizedMapping;

pub fn print_mapping_summary(mapping: &NormalizedMapping) {
    println!(
        "{} {} ({} sources)",
        "Format".green().bold(),
        mapping.format.to_string().cyan(),
        mapping.sources.len()
    );

    for source in &mapping.sources {
        println!(
            "  {} {} [{}] {} properties",
            "Source".bold(),
            source.name.yellow(),
            source.entity_class.cyan(),
            source.property_count()
        );
        if !source.iri_template.is_empty() {
            println!("    template: {}", source.iri_template);
        }
        if let Some(file) = &source.source_file {
            println!("    file: {file}");
        }
        for (column, prop) in &source.properties {
            match &prop.datatype {
                Some(dt) => println!("    {column} -> {} ({dt})", prop.predicate),
                None => println!("    {column} -> {}", prop.predicate),
            }
        }
        for rel in &source.object_properties {
            println!(
                "    {} {} -> {} via {}",
                "rel".magenta(),
                rel.predicate,
                rel.target_class.cyan(),
                rel.join_column.yellow()
            );
            for (column, prop) in &rel.properties {
                println!("      {column} -> {}", prop.predicate);
            }
        }
    }
}

pub fn print_graph_counts(elements: &[GraphElement]) {
    let nodes = elements.iter().filter_map(GraphElement::as_node);
    let (stubs, classes) = nodes.fold((0usize, 0usize), |(s, c), n| {
        if n.stub {
            (s + 1, c)
        } else {
            (s, c + 1)
        }
    });
    let edges = elements.iter().filter(|e| e.as_edge().is_some()).count();
    eprintln!(
        "{} {classes} classes, {stubs} stubs, {edges} edges",
        "graph".green().bold()
    );
}
