use serde::{Deserialize, Serialize};

/// A user profile as served by the users endpoint.
///
/// Every field falls back to its empty value when the server omits it, so a
/// sparse record still renders instead of failing the whole page.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub image: String,
    pub university: String,
    pub company: Company,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Company {
    pub title: String,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// "{title} at {university}", blank parts left empty.
    pub fn affiliation(&self) -> String {
        format!("{} at {}", self.company.title, self.university)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_deserialize_full_record() {
        let user: User = serde_json::from_value(serde_json::json!({
            "id": 1,
            "firstName": "Emily",
            "lastName": "Johnson",
            "email": "emily.johnson@x.dummyjson.com",
            "phone": "+81 965-431-3024",
            "image": "https://dummyjson.com/icon/emilys/128",
            "university": "University of Wisconsin--Madison",
            "company": { "title": "Sales Manager", "department": "Engineering" },
            "age": 28
        }))
        .unwrap();

        assert_eq!(user.id, 1);
        assert_eq!(user.full_name(), "Emily Johnson");
        assert_eq!(
            user.affiliation(),
            "Sales Manager at University of Wisconsin--Madison"
        );
    }

    #[test]
    fn test_missing_fields_become_empty() {
        let user: User = serde_json::from_value(serde_json::json!({ "id": 7 })).unwrap();
        assert_eq!(
            user,
            User {
                id: 7,
                ..User::default()
            }
        );
        assert_eq!(user.affiliation(), " at ");
    }
}
