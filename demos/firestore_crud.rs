use std::collections::BTreeMap;
use std::error::Error;

use firebase_rest_sdk::auth::ServiceAccountCredentials;
use firebase_rest_sdk::connection::{ConnectionOptions, FirebaseConnection};
use firebase_rest_sdk::firestore::{Document, DocumentStore, FirestoreResult, NativeValue};

fn main() -> Result<(), Box<dyn Error>> {
    // Reads the key file named by GOOGLE_APPLICATION_CREDENTIALS. Set FIRESTORE_EMULATOR_HOST
    // to run against the emulator instead of the hosted database.
    let credentials = ServiceAccountCredentials::from_env()?;
    let project_id = credentials
        .project_id
        .clone()
        .unwrap_or_else(|| "demo-project".to_string());
    let connection = FirebaseConnection::with_options(credentials, project_id, ConnectionOptions::from_env())?;
    let store = connection.firestore()?;

    seed_cities(store)?;

    let cities = load_cities(store)?;
    println!("Loaded {} cities from Firestore:", cities.len());
    for city in &cities {
        let name = field_as_string(city, "name").unwrap_or_else(|| "Unknown".into());
        let state = field_as_string(city, "state").unwrap_or_else(|| "Unknown".into());
        let population = city.get("population").and_then(NativeValue::as_i64).unwrap_or_default();
        println!("- {name}, {state}: population {population}");
    }

    let mut patch = BTreeMap::new();
    patch.insert("capital".to_string(), NativeValue::Boolean(true));
    store.update_document("cities/SAC", &patch, true)?;

    println!("Ids in cities: {:?}", store.get_document_ids("cities")?);

    store.delete_document("cities/SAC")?;
    Ok(())
}

fn seed_cities(store: &DocumentStore) -> FirestoreResult<()> {
    for (id, name, state, population) in [
        ("SF", "San Francisco", "CA", 860_000),
        ("LA", "Los Angeles", "CA", 3_900_000),
        ("SAC", "Sacramento", "CA", 525_000),
    ] {
        let mut fields = BTreeMap::new();
        fields.insert("name".to_string(), NativeValue::from(name));
        fields.insert("state".to_string(), NativeValue::from(state));
        fields.insert("population".to_string(), NativeValue::from(population));
        store.update_document(&format!("cities/{id}"), &fields, false)?;
    }
    Ok(())
}

/// Largest Californian cities first.
fn load_cities(store: &DocumentStore) -> FirestoreResult<Vec<Document>> {
    store
        .query("cities")
        .where_("state", "==", "CA")?
        .order_by("population", "desc")
        .limit(10)?
        .execute()
}

fn field_as_string(document: &Document, field: &str) -> Option<String> {
    document.get(field).and_then(NativeValue::as_str).map(str::to_string)
}
