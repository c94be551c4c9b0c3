//! Library integration tests.

use opkit::OpkitError;

#[test]
fn error_types_are_public() {
    let err = OpkitError::ContainerNotFound {
        container: "mysql".into(),
        pod: "db/mysql-0".into(),
    };
    assert!(err.to_string().contains("db/mysql-0"));
}

#[test]
fn result_type_alias_is_public() {
    fn test_fn() -> opkit::Result<()> {
        Ok(())
    }
    assert!(test_fn().is_ok());
}

#[test]
fn cli_types_are_public() {
    use clap::Parser;
    use opkit::cli::{Cli, Commands};

    let cli = Cli::parse_from(["opkit", "password", "--kind", "advance"]);

    if let Commands::Password(args) = cli.command {
        assert_eq!(args.kind, "advance");
    } else {
        panic!("Expected Password command");
    }
}

#[test]
fn engine_types_are_reexported() {
    use opkit::{Executor, Requeue, Task};

    let mut rc = opkit::BaseReconcileContext::new(
        opkit::ObjectKey::new("", "standalone"),
        opkit::WorkContext::background(),
        "test",
    );
    let task: Task<opkit::BaseReconcileContext> = Task::new();
    let outcome = Executor::new(opkit::logging::Logger::new()).execute(&mut rc, task);
    assert_eq!(outcome.unwrap(), Requeue::No);
}

#[test]
fn password_generation_is_public() {
    use opkit::password::{generate_password, PasswordKind};

    let password = generate_password(24, PasswordKind::parse("advance")).unwrap();
    assert_eq!(password.chars().count(), 24);

    let digits = generate_password(8, PasswordKind::Num).unwrap();
    assert!(digits.chars().all(|c| c.is_ascii_digit()));
}
