// Property-based tests for preference resolution.
// CI: 256 cases (default). Soak: PROPTEST_CASES=10000 cargo test --release

use std::collections::HashMap;

use proptest::prelude::*;

use lorecraft_config::{
    PersistedEntry, PreferenceBackend, PreferenceCategory, PreferenceStore, PreferenceValue,
    ResolutionContext, ScopeLevel,
};

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

fn config_256() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(256),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Test backend
// ---------------------------------------------------------------------------

/// Always-succeeding in-memory backend; persistence is exercised separately
/// in lorecraft-io. Here only resolution semantics are under test.
#[derive(Default)]
struct VecBackend {
    entries: Vec<PersistedEntry>,
}

impl PreferenceBackend for VecBackend {
    fn load_all(&mut self) -> Result<Vec<PersistedEntry>, String> {
        Ok(self.entries.clone())
    }

    fn save(&mut self, entry: &PersistedEntry) -> Result<(), String> {
        self.remove(entry.level, &entry.key, entry.category)?;
        self.entries.push(entry.clone());
        Ok(())
    }

    fn remove(
        &mut self,
        level: ScopeLevel,
        key: &str,
        category: PreferenceCategory,
    ) -> Result<(), String> {
        self.entries
            .retain(|e| !(e.level == level && e.key == key && e.category == category));
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Model
// ---------------------------------------------------------------------------

/// Naive oracle: three plain maps and a literal walk of the chain.
#[derive(Default)]
struct Model {
    folder: HashMap<String, String>,
    project: HashMap<String, String>,
    global: Option<String>,
}

impl Model {
    fn resolve(&self, ctx: &ResolutionContext) -> String {
        if let Some(f) = &ctx.folder {
            if let Some(v) = self.folder.get(f) {
                return v.clone();
            }
        }
        if let Some(p) = &ctx.project {
            if let Some(v) = self.project.get(p) {
                return v.clone();
            }
        }
        self.global.clone().unwrap_or_else(|| "light-default".to_string())
    }
}

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
enum Op {
    SetFolder(String, String),
    SetProject(String, String),
    SetGlobal(String),
    UnsetFolder(String),
    UnsetProject(String),
}

fn arb_key(prefix: &'static str) -> impl Strategy<Value = String> {
    (1u8..=4).prop_map(move |n| format!("{prefix}{n}"))
}

fn arb_palette_id() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("light-default".to_string()),
        Just("dark-forest".to_string()),
        Just("sepia".to_string()),
        Just("midnight-ocean".to_string()),
    ]
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (arb_key("f"), arb_palette_id()).prop_map(|(k, v)| Op::SetFolder(k, v)),
        3 => (arb_key("p"), arb_palette_id()).prop_map(|(k, v)| Op::SetProject(k, v)),
        1 => arb_palette_id().prop_map(Op::SetGlobal),
        2 => arb_key("f").prop_map(Op::UnsetFolder),
        2 => arb_key("p").prop_map(Op::UnsetProject),
    ]
}

fn all_contexts() -> Vec<ResolutionContext> {
    let folders = [None, Some("f1"), Some("f2"), Some("f3"), Some("f4")];
    let projects = [None, Some("p1"), Some("p2"), Some("p3"), Some("p4")];
    let mut out = Vec::new();
    for folder in folders {
        for project in projects {
            let mut ctx = ResolutionContext::empty();
            if let Some(f) = folder {
                ctx = ctx.with_folder(f);
            }
            if let Some(p) = project {
                ctx = ctx.with_project(p);
            }
            out.push(ctx);
        }
    }
    out
}

fn apply(store: &mut PreferenceStore, model: &mut Model, op: &Op) {
    let cat = PreferenceCategory::Palette;
    match op {
        Op::SetFolder(k, v) => {
            store.set_at(ScopeLevel::Folder, k, cat, PreferenceValue::Palette(v.clone())).unwrap();
            model.folder.insert(k.clone(), v.clone());
        }
        Op::SetProject(k, v) => {
            store.set_at(ScopeLevel::Project, k, cat, PreferenceValue::Palette(v.clone())).unwrap();
            model.project.insert(k.clone(), v.clone());
        }
        Op::SetGlobal(v) => {
            store.set_at(ScopeLevel::Global, "", cat, PreferenceValue::Palette(v.clone())).unwrap();
            model.global = Some(v.clone());
        }
        Op::UnsetFolder(k) => {
            store.unset_at(ScopeLevel::Folder, k, cat).unwrap();
            model.folder.remove(k);
        }
        Op::UnsetProject(k) => {
            store.unset_at(ScopeLevel::Project, k, cat).unwrap();
            model.project.remove(k);
        }
    }
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]

    /// After any op sequence, the store agrees with the naive model at every
    /// context, and resolving twice gives the same answer (determinism).
    #[test]
    fn store_matches_naive_model(ops in proptest::collection::vec(arb_op(), 0..40)) {
        let mut store = PreferenceStore::open(Box::<VecBackend>::default()).unwrap();
        let mut model = Model::default();

        for op in &ops {
            apply(&mut store, &mut model, op);
        }

        for ctx in all_contexts() {
            let got = store.resolve(&ctx, PreferenceCategory::Palette).clone();
            let again = store.resolve(&ctx, PreferenceCategory::Palette).clone();
            prop_assert_eq!(&got, &again);
            prop_assert_eq!(
                got,
                PreferenceValue::Palette(model.resolve(&ctx))
            );
        }
    }

    /// Reopening from the same backend reproduces resolution exactly:
    /// resolution is a pure function of persisted contents + context.
    #[test]
    fn reopen_preserves_resolution(ops in proptest::collection::vec(arb_op(), 0..40)) {
        let mut backend = VecBackend::default();
        let mut model = Model::default();
        {
            let mut store = PreferenceStore::open(Box::<VecBackend>::default()).unwrap();
            for op in &ops {
                apply(&mut store, &mut model, op);
            }
            // Mirror the final state into the reopened backend
            for entry in store.snapshot() {
                backend.save(&entry).unwrap();
            }
        }

        let reopened = PreferenceStore::open(Box::new(backend)).unwrap();
        for ctx in all_contexts() {
            prop_assert_eq!(
                reopened.resolve(&ctx, PreferenceCategory::Palette).clone(),
                PreferenceValue::Palette(model.resolve(&ctx))
            );
        }
    }

    /// Node-style entries never leak into palette resolution and vice versa.
    #[test]
    fn categories_are_independent(ops in proptest::collection::vec(arb_op(), 0..20)) {
        let mut store = PreferenceStore::open(Box::<VecBackend>::default()).unwrap();
        let mut model = Model::default();

        let node_default = PreferenceCategory::NodeStyle.hard_default();
        for op in &ops {
            apply(&mut store, &mut model, op);
        }

        for ctx in all_contexts() {
            prop_assert_eq!(
                store.resolve(&ctx, PreferenceCategory::NodeStyle),
                &node_default
            );
        }
    }
}
