mod data;
mod planning;
mod products;
mod security;
mod system;
mod transactions;

use super::registry::CommandRegistry;

pub(crate) fn register_all(registry: &mut CommandRegistry) {
    let groups = [
        system::definitions(),
        security::definitions(),
        transactions::definitions(),
        products::definitions(),
        planning::definitions(),
        data::definitions(),
    ];
    for entry in groups.into_iter().flatten() {
        registry.register(entry);
    }
}
