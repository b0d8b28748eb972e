//! Service catalog advertised on `GET /v2/catalog`.
//!
//! The catalog is built once at startup and shared read-only by every
//! request.

use serde::{Deserialize, Serialize};

/// Services and plans this broker offers.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Catalog {
    pub services: Vec<Service>,
}

/// A category of resource the broker can provision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub name: String,
    pub id: String,
    pub description: String,
    pub bindable: bool,
    pub plans: Vec<Plan>,
}

/// A tier of a service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub id: String,
    pub name: String,
    pub description: String,
    pub free: bool,
}

impl Catalog {
    /// The single sample service offered by the mock deployment.
    pub fn sample() -> Self {
        Self {
            services: vec![Service {
                name: "sample-service".to_string(),
                id: "c7067f66-3b6e-417e-bf8e-8ae317ddaafd".to_string(),
                description: "sample-service".to_string(),
                bindable: true,
                plans: vec![Plan {
                    id: "9e2d6f97-c9d9-4924-820b-593e3744ed29".to_string(),
                    name: "sample-plan".to_string(),
                    description: "sample-service-plan".to_string(),
                    free: true,
                }],
            }],
        }
    }
}

/// Source of the catalog served to the platform.
pub trait CatalogProvider: Send + Sync {
    fn catalog(&self) -> &Catalog;
}

/// Catalog fixed for the lifetime of the process.
#[derive(Debug, Clone)]
pub struct StaticCatalog {
    catalog: Catalog,
}

impl StaticCatalog {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }
}

impl Default for StaticCatalog {
    fn default() -> Self {
        Self::new(Catalog::sample())
    }
}

impl CatalogProvider for StaticCatalog {
    fn catalog(&self) -> &Catalog {
        &self.catalog
    }
}
