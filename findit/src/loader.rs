//! Background dataset preparation.
//!
//! Downloading and indexing COCO can take minutes on the first run, so it
//! happens on a worker thread that reports back over a channel. The UI polls
//! [`DatasetLoader::poll`] once per frame.

use std::{
	path::PathBuf,
	sync::{
		Arc,
		mpsc::{Receiver, TryRecvError},
	},
};

use anyhow::{Context, Result};
use dataset::Dataset;

#[derive(Clone)]
pub enum LoadStatus {
	Loading,
	Ready(Arc<Dataset>),
	Failed(String),
}

pub struct DatasetLoader {
	status: LoadStatus,
	rx: Option<Receiver<Result<Dataset, String>>>,
}

impl DatasetLoader {
	/// Start preparing the dataset under `root`. `on_done` runs on the worker once it finishes.
	pub fn spawn(root: Option<PathBuf>, on_done: impl FnOnce() + Send + 'static) -> Self {
		let (tx, rx) = std::sync::mpsc::channel();
		let spawned = std::thread::Builder::new().name("dataset".into()).spawn(move || {
			let result = prepare(root).map_err(|err| format!("{err:#}"));
			if let Err(err) = &result {
				tracing::warn!(error = %err, "dataset unavailable");
			}
			// The receiver may already be gone if the window was closed.
			let _ = tx.send(result);
			on_done();
		});

		match spawned {
			Ok(_) => Self { status: LoadStatus::Loading, rx: Some(rx) },
			Err(err) => Self::failed(format!("failed to start dataset thread: {err}")),
		}
	}

	pub fn failed(reason: impl Into<String>) -> Self {
		Self { status: LoadStatus::Failed(reason.into()), rx: None }
	}

	/// Pick up the worker's result if it has arrived.
	pub fn poll(&mut self) -> &LoadStatus {
		if let Some(rx) = &self.rx {
			match rx.try_recv() {
				Ok(Ok(dataset)) => {
					self.status = LoadStatus::Ready(Arc::new(dataset));
					self.rx = None;
				}
				Ok(Err(err)) => {
					self.status = LoadStatus::Failed(err);
					self.rx = None;
				}
				Err(TryRecvError::Empty) => {}
				Err(TryRecvError::Disconnected) => {
					self.status = LoadStatus::Failed("dataset thread exited unexpectedly".into());
					self.rx = None;
				}
			}
		}
		&self.status
	}
}

fn prepare(root: Option<PathBuf>) -> Result<Dataset> {
	let root = root.context("no dataset directory (set FINDIT_DATASET_DIR)")?;
	tracing::info!(root = %root.display(), "preparing dataset");
	Dataset::prepare(root)
}

#[cfg(test)]
mod tests {
	use std::time::{Duration, Instant};

	use super::*;

	fn wait(loader: &mut DatasetLoader) -> LoadStatus {
		let deadline = Instant::now() + Duration::from_secs(10);
		loop {
			let status = loader.poll().clone();
			if !matches!(status, LoadStatus::Loading) || Instant::now() > deadline {
				return status;
			}
			std::thread::sleep(Duration::from_millis(5));
		}
	}

	#[test]
	fn missing_root_fails() {
		let mut loader = DatasetLoader::spawn(None, || {});
		assert!(matches!(wait(&mut loader), LoadStatus::Failed(msg) if msg.contains("FINDIT_DATASET_DIR")));
	}

	#[test]
	fn unpacked_dataset_becomes_ready() {
		let dir = tempfile::tempdir().unwrap();
		let layout = dataset::Layout::new(dir.path());
		std::fs::create_dir_all(layout.annotation_file().parent().unwrap()).unwrap();
		std::fs::write(
			layout.annotation_file(),
			r#"{"images": [], "annotations": [], "categories": [{"id": 1, "name": "person", "supercategory": "person"}]}"#,
		)
		.unwrap();
		std::fs::create_dir_all(layout.images_dir()).unwrap();

		let (done_tx, done_rx) = std::sync::mpsc::channel();
		let mut loader = DatasetLoader::spawn(Some(dir.path().to_path_buf()), move || {
			let _ = done_tx.send(());
		});
		done_rx.recv_timeout(Duration::from_secs(10)).unwrap();
		match loader.poll() {
			LoadStatus::Ready(dataset) => assert_eq!(dataset.index().categories().len(), 1),
			_ => panic!("dataset should be ready"),
		}
	}
}
