use serde_json::Value;

use crate::services::auth::access_jwt::Claims;
use crate::services::auth::error::AuthError;

/// Require `permission` to be granted by the token's `permissions` claim.
///
/// - The claim is normally a list of strings; a bare string counts as a list of one.
/// - Comparison is exact (no wildcard / prefix matching). Non-string entries never match.
pub fn check_permissions(permission: &str, claims: &Claims) -> Result<(), AuthError> {
    let granted = claims
        .permissions
        .as_ref()
        .ok_or(AuthError::PermissionsClaimMissing)?;

    let found = match granted {
        Value::Array(items) => items.iter().any(|p| p.as_str() == Some(permission)),
        Value::String(single) => single == permission,
        _ => false,
    };
    if !found {
        return Err(AuthError::PermissionNotFound);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    fn raw_claims(permissions: Option<Value>) -> Claims {
        Claims {
            iss: "https://coffee.test/".into(),
            aud: json!("drinks"),
            exp: json!(4_102_444_800u64),
            sub: Some("auth0|barista".into()),
            permissions,
            extra: Default::default(),
        }
    }

    fn claims(permissions: Option<&[&str]>) -> Claims {
        raw_claims(permissions.map(|ps| json!(ps)))
    }

    #[test]
    fn granted_permission_passes() {
        let claims = claims(Some(&["get:drinks-detail", "post:drinks"]));
        assert_eq!(check_permissions("post:drinks", &claims), Ok(()));
    }

    #[test]
    fn missing_permissions_claim() {
        assert_eq!(
            check_permissions("post:drinks", &claims(None)),
            Err(AuthError::PermissionsClaimMissing)
        );
    }

    #[test]
    fn permission_not_granted() {
        let claims = claims(Some(&["get:drinks-detail"]));
        assert_eq!(
            check_permissions("delete:drinks", &claims),
            Err(AuthError::PermissionNotFound)
        );
    }

    #[test]
    fn empty_permissions_grant_nothing() {
        assert_eq!(
            check_permissions("get:drinks-detail", &claims(Some(&[]))),
            Err(AuthError::PermissionNotFound)
        );
    }

    #[test]
    fn match_is_exact() {
        let claims = claims(Some(&["post:drinks"]));
        assert_eq!(
            check_permissions("post:drink", &claims),
            Err(AuthError::PermissionNotFound)
        );
        assert_eq!(
            check_permissions("POST:DRINKS", &claims),
            Err(AuthError::PermissionNotFound)
        );
    }

    #[test]
    fn bare_string_claim_is_a_single_grant() {
        let claims = raw_claims(Some(json!("post:drinks")));
        assert_eq!(check_permissions("post:drinks", &claims), Ok(()));
        assert_eq!(
            check_permissions("post:drinks-detail", &claims),
            Err(AuthError::PermissionNotFound)
        );
    }

    #[test]
    fn odd_claim_shapes_grant_nothing() {
        for raw in [json!(42), json!({"post:drinks": true}), json!([1, null, ["post:drinks"]])] {
            assert_eq!(
                check_permissions("post:drinks", &raw_claims(Some(raw))),
                Err(AuthError::PermissionNotFound)
            );
        }
    }
}
