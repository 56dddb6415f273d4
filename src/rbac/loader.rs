use std::path::Path;

use serde_json::Value;

use crate::errors::RbacError;
use crate::rbac::root::RootPolicy;

/// Load every `.json` policy fragment in `dir` into a fresh `RootPolicy`.
///
/// Each fragment is a JSON object mapping context ids to policy sources.
/// Files are read in path order, though the merged result does not depend
/// on it.
pub fn load_policies(dir: &Path) -> Result<RootPolicy, RbacError> {
    if !dir.is_dir() {
        return Err(RbacError::InvalidFragment(format!(
            "policies directory `{}` does not exist or is not a directory",
            dir.display()
        )));
    }

    let mut entries: Vec<_> = std::fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.path()
                .extension()
                .map(|ext| ext == "json")
                .unwrap_or(false)
        })
        .collect();
    entries.sort_by_key(|e| e.path());

    let mut root = RootPolicy::new();
    let mut file_count = 0;
    let mut context_count = 0;

    for entry in entries {
        let path = entry.path();
        let origin = path.display().to_string();
        let contents = std::fs::read_to_string(&path).map_err(|source| RbacError::PolicyLoad {
            path: origin.clone(),
            source,
        })?;
        context_count += add_fragment(&contents, &origin, &mut root)?;
        file_count += 1;
    }

    tracing::info!(
        files = file_count,
        contexts = context_count,
        "Loaded authorization policies"
    );

    Ok(root)
}

/// Merge an in-memory fragment into `root`. Returns the number of context
/// entries it contained.
pub fn load_fragment_str(source: &str, root: &mut RootPolicy) -> Result<usize, RbacError> {
    add_fragment(source, "<inline>", root)
}

fn add_fragment(source: &str, origin: &str, root: &mut RootPolicy) -> Result<usize, RbacError> {
    let doc: Value = serde_json::from_str(source).map_err(|source| RbacError::Json {
        path: origin.to_string(),
        source,
    })?;

    let Value::Object(contexts) = doc else {
        return Err(RbacError::InvalidFragment(format!(
            "`{origin}` must contain a JSON object keyed by context id"
        )));
    };

    for (context, policy) in &contexts {
        tracing::debug!(origin, context = %context, "adding policy fragment");
        root.add_json_policy_for_context(policy, context);
    }

    Ok(contexts.len())
}
