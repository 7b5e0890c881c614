//! Export followed by import into an empty destination.

mod fixtures;

use blueprint_core::{ClassificationStore, ContentStore, FieldValue, MediaStore, NewTerm, OptionRepository};
use blueprint_relations::RelationshipTable;
use blueprint_transfer::{ExportRequest, MetaOverrides};
use fixtures::{TestSite, destination, populate_warren, source};
use rstest::rstest;

fn export_warren(source: &TestSite) -> blueprint_transfer::ExportOutcome {
	let request = ExportRequest::for_types(["rabbit"])
		.with_taxonomies(["diet"])
		.with_option_keys(vec!["site_name".to_string()])
		.with_overrides(MetaOverrides::default().with_name("Warren"));
	source.exporter().export(&request).unwrap()
}

#[rstest]
fn test_manifest_contents(source: TestSite) {
	// Arrange
	let warren = populate_warren(&source);

	// Act
	let outcome = export_warren(&source);

	// Assert
	let manifest = &outcome.manifest;
	assert_eq!(manifest.models.keys().collect::<Vec<_>>(), vec!["rabbit"]);
	assert_eq!(manifest.taxonomies.keys().collect::<Vec<_>>(), vec!["diet"]);
	assert!(manifest.posts.contains_key(&warren.peter.id));
	assert!(manifest.posts.contains_key(&warren.benjamin.id));
	assert!(!manifest.posts.contains_key(&warren.draft.id));
	assert_eq!(manifest.post_terms[&warren.peter.id].len(), 2);
	assert_eq!(
		manifest.media[&warren.photo.id],
		format!("media/{}/peter.png", warren.photo.id)
	);
	assert_eq!(manifest.media_titles[&warren.photo.id], "Portrait");
	assert_eq!(manifest.relationships.len(), 1);
	assert_eq!(manifest.options["site_name"], serde_json::json!("Warren"));
}

#[rstest]
fn test_round_trip_preserves_counts_and_values(source: TestSite, destination: TestSite) {
	// Arrange
	let warren = populate_warren(&source);
	let outcome = export_warren(&source);

	// Act
	let report = destination.importer().import_blueprint(&outcome.archive).unwrap();

	// Assert
	assert!(report.is_clean(), "failures: {:?}", report.failures().collect::<Vec<_>>());
	assert!(report.cleaned_up);
	assert!(!outcome.archive.exists());
	assert!(destination.staging_is_empty());

	let rabbits = destination.entries_of("rabbit");
	assert_eq!(rabbits.len(), 2);

	let peter = report.entries.get(warren.peter.id).unwrap();
	let imported = destination.site.get_entry(peter).unwrap().unwrap();
	assert_eq!(imported.title, "Peter");
	assert_eq!(imported.body, "Mischievous");
	assert_eq!(imported.created_at, warren.peter.created_at);

	let terms: Vec<String> = destination
		.site
		.entry_terms(peter)
		.unwrap()
		.into_iter()
		.map(|t| format!("{}/{}", t.taxonomy, t.slug))
		.collect();
	assert_eq!(terms, vec!["category/uncategorized", "diet/hay"]);

	let photo = report.media.get(warren.photo.id).unwrap();
	let meta = destination.site.entry_meta(peter).unwrap();
	assert_eq!(meta[0].meta_value, FieldValue::text("brown"));
	assert_eq!(meta[1].meta_value, FieldValue::media(photo));

	let media = destination.site.get_media(photo).unwrap().unwrap();
	assert_eq!(media.filename, "peter.png");
	assert_eq!(media.title, "Portrait");
	assert_eq!(media.renditions.len(), 2);
	assert_eq!(
		std::fs::read(destination.site.media_path(&media)).unwrap(),
		std::fs::read(source.site.media_path(&warren.photo)).unwrap()
	);

	assert_eq!(destination.table.records().unwrap().len(), 1);
	assert_eq!(
		destination.site.get_option("site_name").unwrap(),
		Some(serde_json::json!("Warren"))
	);
}

#[rstest]
fn test_term_hierarchy_survives_without_assigned_parent(source: TestSite) {
	// Arrange
	let warren = populate_warren(&source);
	let vegetables = source
		.site
		.insert_term(NewTerm::new("category", "vegetables", "Vegetables"))
		.unwrap();
	let carrots = source
		.site
		.insert_term(NewTerm::new("category", "carrots", "Carrots").with_parent(vegetables.id))
		.unwrap();
	source.site.assign_term(warren.peter.id, carrots.id).unwrap();
	let outcome = export_warren(&source);
	let destination = TestSite::new(500);

	// Act
	let report = destination.importer().import_blueprint(&outcome.archive).unwrap();

	// Assert
	assert!(report.is_clean(), "failures: {:?}", report.failures().collect::<Vec<_>>());
	let imported_vegetables = destination.site.find_term("category", "vegetables").unwrap().unwrap();
	let imported_carrots = destination.site.find_term("category", "carrots").unwrap().unwrap();
	assert_ne!(imported_vegetables.id, vegetables.id);
	assert_eq!(imported_carrots.parent, Some(imported_vegetables.id));
	assert_eq!(imported_vegetables.parent, None);

	let peter = report.entries.get(warren.peter.id).unwrap();
	let slugs: Vec<String> = destination
		.site
		.entry_terms(peter)
		.unwrap()
		.into_iter()
		.map(|t| t.slug)
		.collect();
	assert!(slugs.contains(&"carrots".to_string()));
	assert!(!slugs.contains(&"vegetables".to_string()));
}

#[rstest]
fn test_relationship_endpoints_exist_at_destination(source: TestSite) {
	// Arrange
	populate_warren(&source);
	let outcome = export_warren(&source);
	let destination = TestSite::new(1000);

	// Act
	destination.importer().import_blueprint(&outcome.archive).unwrap();

	// Assert
	for record in destination.table.records().unwrap() {
		assert!(destination.site.get_entry(record.link.id1).unwrap().is_some());
		assert!(destination.site.get_entry(record.link.id2).unwrap().is_some());
	}
}

#[rstest]
fn test_second_import_reports_conflicts_but_adds_content(source: TestSite, destination: TestSite) {
	// Arrange
	populate_warren(&source);
	let first = export_warren(&source);
	destination.importer().import_blueprint(&first.archive).unwrap();
	let second = export_warren(&source);

	// Act
	let report = destination.importer().import_blueprint(&second.archive).unwrap();

	// Assert
	assert!(!report.is_clean());
	assert_eq!(
		report.step("create_models").unwrap().summary_line(),
		"0 of 1 models imported, 1 conflicts"
	);
	assert_eq!(report.step("import_terms").unwrap().succeeded, 2);
	assert_eq!(destination.entries_of("rabbit").len(), 4);
	assert_eq!(destination.site.terms("diet").unwrap().len(), 1);
}
