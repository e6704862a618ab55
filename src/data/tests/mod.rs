mod dataloader;
mod dataset;
mod transforms;

use super::DataManifest;

/// `n`行、单通道列的清单，第`i`行的路径为`img_{i}.png`
pub(super) fn manifest_with_rows(n: usize) -> DataManifest {
    let headers = vec!["SubjectID".to_string(), "Channel_0".to_string()];
    let rows = (0..n)
        .map(|i| vec![format!("subject_{i}"), format!("img_{i}.png")])
        .collect();
    DataManifest::new(headers, rows)
}
