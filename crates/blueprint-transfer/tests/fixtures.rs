//! Shared fixtures for blueprint-transfer integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use blueprint_core::{
	Cardinality, ClassificationStore, ContentModel, ContentStore, Entry, FieldDefinition, FieldType, FieldValue,
	MediaItem, MediaStore, MemorySite, MetaEntry, NewEntry, NewTerm, OptionRepository, Taxonomy, Term,
};
use blueprint_relations::MemoryRelationshipTable;
use blueprint_transfer::{Exporter, Importer, Resetter, SiteContext, TransferSettings};
use rstest::fixture;
use tempfile::TempDir;

/// A file-backed in-memory site with its own staging and output directories.
pub struct TestSite {
	pub root: TempDir,
	pub site: Arc<MemorySite>,
	pub table: Arc<MemoryRelationshipTable>,
	pub context: SiteContext,
	pub settings: TransferSettings,
}

impl TestSite {
	/// Creates a site whose identifiers start at `id_offset`.
	pub fn new(id_offset: u64) -> Self {
		let root = tempfile::tempdir().unwrap();
		let site = Arc::new(MemorySite::new(root.path().join("media")).with_id_offset(id_offset));
		let table = Arc::new(MemoryRelationshipTable::new());
		let context = SiteContext::from_memory(site.clone(), table.clone());
		let settings = TransferSettings::new()
			.with_staging_dir(root.path().join("staging"))
			.with_output_dir(root.path().join("out"));
		Self {
			root,
			site,
			table,
			context,
			settings,
		}
	}

	pub fn exporter(&self) -> Exporter {
		Exporter::new(self.context.clone(), self.settings.clone())
	}

	pub fn importer(&self) -> Importer {
		Importer::new(self.context.clone(), self.settings.clone())
	}

	pub fn resetter(&self) -> Resetter {
		Resetter::new(self.context.clone())
	}

	/// Returns true if no import left anything in the staging directory.
	pub fn staging_is_empty(&self) -> bool {
		match std::fs::read_dir(&self.settings.staging_dir) {
			Ok(mut entries) => entries.next().is_none(),
			Err(_) => true,
		}
	}

	pub fn entries_of(&self, entry_type: &str) -> Vec<Entry> {
		self.site
			.find_entries(&blueprint_core::EntryQuery::of_types([entry_type]))
			.unwrap()
	}
}

#[fixture]
pub fn source() -> TestSite {
	TestSite::new(1)
}

#[fixture]
pub fn destination() -> TestSite {
	TestSite::new(1)
}

pub fn rabbit_model() -> ContentModel {
	ContentModel::new("rabbit", "Rabbit", "Rabbits")
		.with_field(FieldDefinition::new("color", "Color", FieldType::Text))
		.with_field(FieldDefinition::new("photo", "Photo", FieldType::Media))
		.with_field(FieldDefinition::relationship(
			"friend",
			"Friends",
			"rabbit",
			Cardinality::ManyToMany,
		))
}

/// Writes a small PNG and imports it as media.
pub fn upload_png(site: &TestSite, name: &str) -> MediaItem {
	let path = site.root.path().join(name);
	image::RgbImage::from_pixel(320, 240, image::Rgb([120, 90, 60]))
		.save(&path)
		.unwrap();
	site.site.import_file(&path, Some("Portrait")).unwrap()
}

/// Handles to the records created by [`populate_warren`].
pub struct Warren {
	pub peter: Entry,
	pub benjamin: Entry,
	pub draft: Entry,
	pub hay: Term,
	pub photo: MediaItem,
}

/// Two published rabbits (linked as friends), one draft, a taxonomy with a
/// term, a photo and an option.
pub fn populate_warren(site: &TestSite) -> Warren {
	site.context.models().create(rabbit_model()).unwrap();
	site.context
		.taxonomies()
		.create(Taxonomy::new("diet", "Diet", "Diets", ["rabbit"]))
		.unwrap();
	let hay = site.site.insert_term(NewTerm::new("diet", "hay", "Hay")).unwrap();
	let photo = upload_png(site, "peter.png");

	let peter = site
		.site
		.insert_entry(NewEntry::published("rabbit", "Peter").with_body("Mischievous"))
		.unwrap();
	let benjamin = site
		.site
		.insert_entry(NewEntry::published("rabbit", "Benjamin"))
		.unwrap();
	let draft = site.site.insert_entry(NewEntry::new("rabbit", "Flopsy")).unwrap();

	site.site
		.add_entry_meta(peter.id, MetaEntry::new("color", FieldValue::text("brown")))
		.unwrap();
	site.site
		.add_entry_meta(peter.id, MetaEntry::new("photo", FieldValue::media(photo.id)))
		.unwrap();
	site.site
		.add_entry_meta(benjamin.id, MetaEntry::new("color", FieldValue::text("grey")))
		.unwrap();

	for entry in [&peter, &benjamin] {
		site.site.assign_term(entry.id, 1).unwrap();
	}
	site.site.assign_term(peter.id, hay.id).unwrap();

	site.context
		.relationship_store()
		.link(peter.id, benjamin.id, "friend", Cardinality::ManyToMany)
		.unwrap();
	site.site
		.set_option("site_name", serde_json::json!("Warren"))
		.unwrap();

	Warren {
		peter,
		benjamin,
		draft,
		hay,
		photo,
	}
}
