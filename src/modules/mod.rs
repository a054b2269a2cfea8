pub mod authors;
pub mod book_instances;
pub mod books;
pub mod genres;
pub mod home;
pub mod store;

use locallib_kernel::ModuleRegistry;

use crate::catalog::Catalog;

/// Register the store as a core module and every page module as custom
pub fn register_all(registry: &mut ModuleRegistry, catalog: &Catalog) {
    registry.register_core(store::create_module(catalog.clone()));

    registry.register_custom(home::create_module(catalog.clone()));
    registry.register_custom(books::create_module(catalog.clone()));
    registry.register_custom(authors::create_module(catalog.clone()));
    registry.register_custom(genres::create_module(catalog.clone()));
    registry.register_custom(book_instances::create_module(catalog.clone()));
}
