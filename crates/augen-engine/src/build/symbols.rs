use std::collections::BTreeMap;

///
/// SymbolTable
///
/// The surrounding program's type declarations, keyed by path. Built once
/// per unit and shared read-only by every builder; this is the "symbol
/// information" a candidate is resolved against.
///

#[derive(Debug, Default)]
pub struct SymbolTable {
    items: BTreeMap<String, syn::Item>,
}

impl SymbolTable {
    #[must_use]
    pub fn from_file(file: &syn::File) -> Self {
        let mut table = Self::default();
        table.collect(&file.items, "");

        table
    }

    fn collect(&mut self, items: &[syn::Item], module_path: &str) {
        for item in items {
            match item {
                syn::Item::Mod(module) => {
                    if let Some((_, nested)) = &module.content {
                        let nested_path = join_path(module_path, &module.ident.to_string());
                        self.collect(nested, &nested_path);
                    }
                }
                syn::Item::Struct(node) => {
                    self.insert(module_path, &node.ident.to_string(), item);
                }
                syn::Item::Enum(node) => {
                    self.insert(module_path, &node.ident.to_string(), item);
                }
                _ => {}
            }
        }
    }

    fn insert(&mut self, module_path: &str, ident: &str, item: &syn::Item) {
        self.items
            .insert(join_path(module_path, ident), item.clone());
    }

    #[must_use]
    pub fn get(&self, path: &str) -> Option<&syn::Item> {
        self.items.get(path)
    }

    /// Resolve an ident the way the unit would: the referencing module
    /// first, then the unit root.
    #[must_use]
    pub fn resolve(&self, from_module: &str, ident: &str) -> Option<(String, &syn::Item)> {
        let local = join_path(from_module, ident);
        if let Some(item) = self.items.get(&local) {
            return Some((local, item));
        }

        self.items.get(ident).map(|item| (ident.to_string(), item))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

fn join_path(base: &str, segment: &str) -> String {
    if base.is_empty() {
        segment.to_string()
    } else {
        format!("{base}::{segment}")
    }
}
