//! A headless contact list: builds a setup, mutates the list and prints the
//! notifications a widget would receive.
//!
//! Run with `RUST_LOG=recyclical=trace` to see the library's own logging.

use std::sync::Arc;

use recyclical::datasource::selectable_data_source_of;
use recyclical::{
    AdapterSurface, DataSource, EmptyView, ItemDefinition, LayoutId, ListItem, SelectableSource,
    Setup, TypeKey, ViewKind,
};

#[derive(Clone, PartialEq, Debug)]
enum Contact {
    Letter(char),
    Person { id: u64, name: String },
}

impl ListItem for Contact {
    fn type_key(&self) -> TypeKey {
        match self {
            Contact::Letter(_) => TypeKey::new("Letter"),
            Contact::Person { .. } => TypeKey::new("Person"),
        }
    }
}

struct PrintingSurface;

impl AdapterSurface for PrintingSurface {
    fn notify_item_range_inserted(&self, position: usize, count: usize) {
        println!("  inserted {count} at {position}");
    }

    fn notify_item_range_removed(&self, position: usize, count: usize) {
        println!("  removed {count} at {position}");
    }

    fn notify_item_range_changed(&self, position: usize, count: usize) {
        println!("  changed {count} at {position}");
    }

    fn notify_item_moved(&self, from: usize, to: usize) {
        println!("  moved {from} -> {to}");
    }

    fn notify_data_set_changed(&self) {
        println!("  reset");
    }
}

struct PrintingEmptyView;

impl EmptyView for PrintingEmptyView {
    fn set_visible(&self, visible: bool) {
        println!("  empty view visible: {visible}");
    }
}

fn person(id: u64, name: &str) -> Contact {
    Contact::Person {
        id,
        name: name.to_string(),
    }
}

fn same_identity(old: &Contact, new: &Contact) -> bool {
    match (old, new) {
        (Contact::Letter(a), Contact::Letter(b)) => a == b,
        (Contact::Person { id: a, .. }, Contact::Person { id: b, .. }) => a == b,
        _ => false,
    }
}

fn main() -> Result<(), recyclical::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let contacts = selectable_data_source_of(Vec::new());

    println!("attach");
    let handle = Setup::<Contact>::new()
        .with_data_source(contacts.clone())
        .with_empty_view(Arc::new(PrintingEmptyView))
        .with_item(
            LayoutId(1),
            ItemDefinition::new("Letter").on_bind(
                |_| String::new(),
                |text: &mut String, _, contact: &Contact| {
                    if let Contact::Letter(letter) = contact {
                        *text = letter.to_string();
                    }
                },
            ),
        )
        .with_item(
            LayoutId(2),
            ItemDefinition::new("Person")
                .on_bind(
                    |_| String::new(),
                    |text: &mut String, _, contact: &Contact| {
                        if let Contact::Person { name, .. } = contact {
                            text.clone_from(name);
                        }
                    },
                )
                .on_click(|state, index| {
                    if let Ok(selected) = state.toggle_selection() {
                        println!("  clicked {index}, selection changed: {selected}");
                    }
                }),
        )
        .attach(Arc::new(PrintingSurface))?;

    println!("add");
    contacts.add(vec![
        Contact::Letter('A'),
        person(1, "Ada"),
        person(2, "Alan"),
        Contact::Letter('G'),
        person(3, "Grace"),
    ]);

    println!("click Alan");
    let adapter = handle.adapter();
    let mut holder = adapter.create_view_holder(ViewKind::new(2))?;
    adapter.bind_view_holder(&mut holder, 2)?;
    adapter.item_clicked(&holder)?;

    println!("rename Ada, drop Grace's section");
    contacts.set_with_diff(
        vec![
            Contact::Letter('A'),
            person(1, "Ada Lovelace"),
            person(2, "Alan"),
        ],
        &same_identity,
        &|old, new| old == new,
    );
    println!("selected: {:?}", contacts.selected_indices());

    println!("clear");
    contacts.clear();

    handle.detach_data_source();
    Ok(())
}
