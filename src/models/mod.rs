pub mod requests;
pub mod responses;

pub use requests::{
    BatchCleanRequest, CleanRequest, CompareRequest, EntitiesRequest, FrequenciesRequest,
    PreprocessRequest,
};
pub use responses::{
    BatchCleanResponse, CleanResponse, CompareResponse, EntitiesResponse, FrequenciesResponse,
    HealthResponse, PreprocessResponse, WordCount,
};
