/// The requests a workload sends to the todo service.
#[derive(derive_more::Display, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    #[display("create")]
    Create,
    #[display("update")]
    Update,
    #[display("delete")]
    Delete,
}

impl Operation {
    /// The only status code that counts as success for this operation.
    pub fn expected_status(&self) -> u16 {
        match self {
            Operation::Create => 201,
            Operation::Update | Operation::Delete => 200,
        }
    }
}

/// Returned when the service answers with anything other than the expected status.
///
/// This is fatal to the loop that issued the request, but not to the run. The samples collected
/// before the failure are still reported.
#[derive(derive_more::Error, derive_more::Display, Debug, Clone, PartialEq, Eq)]
#[display("Error at {index} code: {status} ({operation}, expected {expected})")]
pub struct UnexpectedStatus {
    pub operation: Operation,
    pub index: u64,
    pub status: u16,
    pub expected: u16,
}

/// Check the status returned for the `index`-th request of a loop.
pub fn check_status(operation: Operation, index: u64, status: u16) -> Result<(), UnexpectedStatus> {
    let expected = operation.expected_status();
    if status == expected {
        Ok(())
    } else {
        Err(UnexpectedStatus {
            operation,
            index,
            status,
            expected,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_expects_201() {
        assert!(check_status(Operation::Create, 1, 201).is_ok());
        assert!(check_status(Operation::Create, 1, 200).is_err());
    }

    #[test]
    fn update_and_delete_expect_200() {
        assert!(check_status(Operation::Update, 3, 200).is_ok());
        assert!(check_status(Operation::Delete, 3, 200).is_ok());
        assert!(check_status(Operation::Delete, 3, 404).is_err());
    }

    #[test]
    fn error_reports_index_and_code() {
        let err = check_status(Operation::Create, 7, 500).unwrap_err();
        assert_eq!(err.index, 7);
        assert_eq!(err.status, 500);
        assert_eq!(
            err.to_string(),
            "Error at 7 code: 500 (create, expected 201)"
        );
    }
}
