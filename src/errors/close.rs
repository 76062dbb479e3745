use core::fmt::{self, Display, Formatter};

use crate::any::TypeInfo;

#[derive(thiserror::Error, Debug)]
pub enum CloseErrorKind {
    #[error("{} finalizer(s) failed during container close: {}", failures.len(), FailureList(failures))]
    Finalize { failures: Vec<(TypeInfo, anyhow::Error)> },
}

struct FailureList<'a>(&'a [(TypeInfo, anyhow::Error)]);

impl Display for FailureList<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut failures = self.0.iter();
        if let Some((type_info, err)) = failures.next() {
            write!(f, "`{type_info}`: {err}")?;
        }
        for (type_info, err) in failures {
            write!(f, "; `{type_info}`: {err}")?;
        }
        Ok(())
    }
}
