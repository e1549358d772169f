use stylist::ai_gateway::{
    credentials::{CredentialProvider, EnvCredentialProvider},
    error::GatewayErrorKind,
    types::CredentialRef,
};
use uuid::Uuid;

use crate::support::profile;

#[tokio::test]
async fn given_unset_env_var_when_resolving_then_authentication_error_names_the_variable() {
    let var = format!("STYLIST_TEST_UNSET_{}", Uuid::now_v7().simple());
    let reference = CredentialRef::Env { var: var.clone() };

    let err = match EnvCredentialProvider
        .resolve(&reference, &profile("b1", reference.clone()))
        .await
    {
        Ok(_) => panic!("unset variable must not resolve"),
        Err(err) => err,
    };

    assert_eq!(err.kind, GatewayErrorKind::Authentication);
    assert!(!err.retryable);
    assert_eq!(err.backend_id.as_deref(), Some("b1"));
    assert!(err.message.contains(&var));
}

#[tokio::test]
async fn given_set_env_var_when_resolving_then_api_key_is_returned() {
    let var = format!("STYLIST_TEST_SET_{}", Uuid::now_v7().simple());
    // SAFETY: the variable name is unique to this test.
    unsafe { std::env::set_var(&var, "secret-value") };
    let reference = CredentialRef::Env { var: var.clone() };

    let credential = EnvCredentialProvider
        .resolve(&reference, &profile("b1", reference.clone()))
        .await
        .expect("set variable should resolve");

    assert_eq!(credential.api_key.as_deref(), Some("secret-value"));
    assert!(!format!("{credential:?}").contains("secret-value"));
    unsafe { std::env::remove_var(&var) };
}

#[tokio::test]
async fn given_blank_inline_token_when_resolving_then_invalid_request_is_returned() {
    let reference = CredentialRef::InlineToken {
        token: "  ".to_string(),
    };

    let err = match EnvCredentialProvider
        .resolve(&reference, &profile("b1", reference.clone()))
        .await
    {
        Ok(_) => panic!("blank inline token must not resolve"),
        Err(err) => err,
    };

    assert_eq!(err.kind, GatewayErrorKind::InvalidRequest);
}

#[tokio::test]
async fn given_none_reference_when_resolving_then_no_api_key_is_attached() {
    let credential = EnvCredentialProvider
        .resolve(&CredentialRef::None, &profile("b1", CredentialRef::None))
        .await
        .expect("none always resolves");

    assert!(credential.api_key.is_none());
}
