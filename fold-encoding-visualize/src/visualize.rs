use std::collections::VecDeque;
use std::fmt::Display;
use std::path::Path;

use fold_encoding::{Fev, MappableFrame};
use serde::Serialize;
use tracing::debug;

pub type VizNodeId = u32;

/// Instantiation that also records every handler firing.
pub trait FevVizExt<F: MappableFrame> {
    fn fold_v<Out>(&self, alg: impl FnMut(F::Frame<Out>) -> Out) -> (Out, Viz)
    where
        F::Frame<()>: Display,
        Out: Display;

    fn try_fold_v<Out, E>(
        &self,
        alg: impl FnMut(F::Frame<Out>) -> Result<Out, E>,
    ) -> (Result<Out, E>, Viz)
    where
        F::Frame<()>: Display,
        Out: Display,
        E: Display;
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "typ", rename_all = "snake_case")]
pub enum VizAction {
    // a handler fired on `shape`, consuming the results of `children`
    Instantiate {
        node_id: VizNodeId,
        shape: String,
        children: Vec<VizNodeId>,
        result: String,
    },
    // a handler failed, no further handlers fire
    Failed {
        node_id: VizNodeId,
        shape: String,
        error: String,
    },
    // info text display!
    InfoCard {
        info_header: String,
        info_txt: String,
    },
}

#[derive(Clone, Debug, Serialize)]
pub struct Viz {
    root_id: Option<VizNodeId>,
    actions: Vec<VizAction>,
}

#[derive(Debug, thiserror::Error)]
pub enum VizWriteError {
    #[error("failed to serialize trace")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to write trace file")]
    Io(#[from] std::io::Error),
}

impl Viz {
    /// the node whose handler produced the final result, if the instantiation completed
    pub fn root_id(&self) -> Option<VizNodeId> {
        self.root_id
    }

    pub fn actions(&self) -> &[VizAction] {
        &self.actions
    }

    /// Put an info card in front of the recorded actions.
    pub fn label(mut self, info_header: impl Into<String>, info_txt: impl Into<String>) -> Self {
        self.actions.insert(
            0,
            VizAction::InfoCard {
                info_header: info_header.into(),
                info_txt: info_txt.into(),
            },
        );
        self
    }

    /// Append another trace after this one, separated by an info card.
    ///
    /// Node ids of `next` are shifted past this trace's ids so the two never collide.
    pub fn fuse(self, next: Self, info_header: impl Into<String>, info_txt: impl Into<String>) -> Self {
        let offset = self
            .actions
            .iter()
            .filter_map(|a| match a {
                VizAction::Instantiate { node_id, .. } | VizAction::Failed { node_id, .. } => {
                    Some(*node_id + 1)
                }
                VizAction::InfoCard { .. } => None,
            })
            .max()
            .unwrap_or(0);

        let mut actions = self.actions;
        actions.push(VizAction::InfoCard {
            info_header: info_header.into(),
            info_txt: info_txt.into(),
        });
        actions.extend(next.actions.into_iter().map(|a| match a {
            VizAction::Instantiate {
                node_id,
                shape,
                children,
                result,
            } => VizAction::Instantiate {
                node_id: node_id + offset,
                shape,
                children: children.into_iter().map(|c| c + offset).collect(),
                result,
            },
            VizAction::Failed {
                node_id,
                shape,
                error,
            } => VizAction::Failed {
                node_id: node_id + offset,
                shape,
                error,
            },
            card => card,
        }));

        Self {
            root_id: next.root_id.map(|r| r + offset),
            actions,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn write(&self, path: impl AsRef<Path>) -> Result<(), VizWriteError> {
        let path = path.as_ref();
        let json = self.to_json()?;
        std::fs::write(path, json)?;
        debug!(path = %path.display(), actions = self.actions.len(), "wrote trace");
        Ok(())
    }
}

// split a frame of (node id, result) pairs into its shape, its child ids and a frame of results
fn unzip_frame<F, Out>(frame: F::Frame<(VizNodeId, Out)>) -> (String, Vec<VizNodeId>, F::Frame<Out>)
where
    F: MappableFrame,
    F::Frame<()>: Display,
{
    let mut children = Vec::new();
    let mut outs = VecDeque::new();
    let shape = F::map_frame(frame, |(id, out)| {
        children.push(id);
        outs.push_back(out);
    });
    let shape_txt = shape.to_string();
    let frame = F::map_frame(shape, |_: ()| {
        outs.pop_front()
            .expect("map_frame visits positions in a stable order")
    });
    (shape_txt, children, frame)
}

impl<F: MappableFrame> FevVizExt<F> for Fev<F> {
    fn fold_v<Out>(&self, mut alg: impl FnMut(F::Frame<Out>) -> Out) -> (Out, Viz)
    where
        F::Frame<()>: Display,
        Out: Display,
    {
        let mut keygen: VizNodeId = 0;
        let mut actions = Vec::new();

        let (root_id, out) = self.fold(|frame: F::Frame<(VizNodeId, Out)>| {
            let (shape, children, frame) = unzip_frame::<F, Out>(frame);
            let out = alg(frame);

            let node_id = keygen;
            keygen += 1;
            actions.push(VizAction::Instantiate {
                node_id,
                shape,
                children,
                result: out.to_string(),
            });
            (node_id, out)
        });

        actions.push(VizAction::InfoCard {
            info_header: "Completed".to_string(),
            info_txt: format!("result: {}", out),
        });

        (
            out,
            Viz {
                root_id: Some(root_id),
                actions,
            },
        )
    }

    fn try_fold_v<Out, E>(
        &self,
        mut alg: impl FnMut(F::Frame<Out>) -> Result<Out, E>,
    ) -> (Result<Out, E>, Viz)
    where
        F::Frame<()>: Display,
        Out: Display,
        E: Display,
    {
        let mut keygen: VizNodeId = 0;
        let mut actions = Vec::new();

        let res = self.try_fold(|frame: F::Frame<(VizNodeId, Out)>| {
            let (shape, children, frame) = unzip_frame::<F, Out>(frame);

            let node_id = keygen;
            keygen += 1;
            match alg(frame) {
                Ok(out) => {
                    actions.push(VizAction::Instantiate {
                        node_id,
                        shape,
                        children,
                        result: out.to_string(),
                    });
                    Ok((node_id, out))
                }
                Err(e) => {
                    actions.push(VizAction::Failed {
                        node_id,
                        shape,
                        error: e.to_string(),
                    });
                    Err(e)
                }
            }
        });

        match res {
            Ok((root_id, out)) => {
                actions.push(VizAction::InfoCard {
                    info_header: "Completed".to_string(),
                    info_txt: format!("result: {}", out),
                });
                (
                    Ok(out),
                    Viz {
                        root_id: Some(root_id),
                        actions,
                    },
                )
            }
            Err(e) => {
                actions.push(VizAction::InfoCard {
                    info_header: "Error during instantiation!".to_string(),
                    info_txt: format!("error: {}", e),
                });
                (
                    Err(e),
                    Viz {
                        root_id: None,
                        actions,
                    },
                )
            }
        }
    }
}
