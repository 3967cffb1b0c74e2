use thiserror::Error;

use crate::domain::Arn;
use crate::ports::SinkError;

#[derive(Debug, Error)]
pub enum HeraldError {
    #[error("submission failed for {arn}: {source}")]
    Submission {
        arn: Arn,
        #[source]
        source: SinkError,
    },
}
