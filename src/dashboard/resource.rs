/// Remote data held by a page surface.
///
/// Follows the RemoteData pattern: a surface body is either untouched,
/// waiting for its first payload, showing rows, or showing the message of
/// the last failed refresh. Keeping the four states in one enum avoids
/// separate `loading: bool` / `error: Option<String>` fields drifting apart.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resource<T, E = String> {
    /// Nothing requested yet
    NotAsked,

    /// First request outstanding
    Loading,

    /// Last refresh succeeded
    Success(T),

    /// Last refresh failed
    Failure(E),
}

impl<T, E> Resource<T, E> {
    /// Build from the outcome of a refresh
    pub fn from_result(result: Result<T, E>) -> Self {
        match result {
            Ok(data) => Resource::Success(data),
            Err(e) => Resource::Failure(e),
        }
    }

    /// True until the first refresh is issued
    pub fn is_not_asked(&self) -> bool {
        matches!(self, Resource::NotAsked)
    }

    /// True while the first refresh is outstanding
    pub fn is_loading(&self) -> bool {
        matches!(self, Resource::Loading)
    }

    /// True when the last refresh delivered data
    pub fn is_success(&self) -> bool {
        matches!(self, Resource::Success(_))
    }

    /// True when the last refresh failed
    pub fn is_failure(&self) -> bool {
        matches!(self, Resource::Failure(_))
    }

    /// Borrow the data of a successful refresh
    pub fn success(&self) -> Option<&T> {
        match self {
            Resource::Success(data) => Some(data),
            _ => None,
        }
    }

    /// Borrow the message of a failed refresh
    pub fn failure(&self) -> Option<&E> {
        match self {
            Resource::Failure(e) => Some(e),
            _ => None,
        }
    }
}

impl<T, E> Default for Resource<T, E> {
    fn default() -> Self {
        Resource::NotAsked
    }
}

impl<T, E> From<Result<T, E>> for Resource<T, E> {
    fn from(result: Result<T, E>) -> Self {
        Resource::from_result(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_result_maps_both_paths() {
        let ok: Resource<u32> = Ok(3).into();
        assert_eq!(ok.success(), Some(&3));
        assert!(ok.is_success());

        let err: Resource<u32> = Err("boom".to_string()).into();
        assert_eq!(err.failure().map(String::as_str), Some("boom"));
        assert!(err.is_failure());
    }

    #[test]
    fn test_default_is_not_asked() {
        let resource: Resource<Vec<String>> = Resource::default();
        assert!(resource.is_not_asked());
        assert!(resource.success().is_none());
    }
}
