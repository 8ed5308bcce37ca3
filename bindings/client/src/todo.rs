use serde::Serialize;

/// Length of the title and description of the payload sent by the workloads, roughly 1KB each.
pub const FILLER_FIELD_LEN: usize = 1000;

/// The body of a create or update request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub title: String,
    pub done_status: bool,
    pub description: String,
}

impl Todo {
    /// A todo whose title and description are `len` repetitions of `a`.
    pub fn filler(len: usize) -> Self {
        Self::filler_with(len, 'a', 'a')
    }

    /// A todo whose title is `len` repetitions of `title` and description `len` repetitions of
    /// `description`.
    pub fn filler_with(len: usize, title: char, description: char) -> Self {
        Self {
            title: title.to_string().repeat(len),
            done_status: false,
            description: description.to_string().repeat(len),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn serialises_with_service_field_names() {
        let json = serde_json::to_value(Todo::filler(3)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "title": "aaa",
                "doneStatus": false,
                "description": "aaa",
            })
        );
    }

    #[test]
    fn filler_payload_size() {
        let todo = Todo::filler(FILLER_FIELD_LEN);
        assert_eq!(todo.title.len(), 1000);
        assert_eq!(todo.description.len(), 1000);
        assert!(!todo.done_status);
    }

    #[test]
    fn filler_with_distinct_description() {
        let todo = Todo::filler_with(4, 'a', 'b');
        assert_eq!(todo.title, "aaaa");
        assert_eq!(todo.description, "bbbb");
    }
}
