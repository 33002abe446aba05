use crate::types::ReturnKind;

/// Return kind implied by a statement's leading keyword.
///
/// The keyword is matched case-insensitively after leading whitespace and comments.
/// `INSERT` yields the new rowid, data-changing and DDL verbs yield the change count,
/// and everything else (`SELECT`, `SHOW`, `DESCRIBE`, `WITH`, `PRAGMA`, ...) yields rows.
#[must_use]
pub fn infer_return_kind(sql: &str) -> ReturnKind {
    let keyword = leading_keyword(sql);
    match keyword.to_ascii_uppercase().as_str() {
        "INSERT" => ReturnKind::LastInsertId,
        "UPDATE" | "DELETE" | "ALTER" | "DROP" | "RENAME" | "CREATE" | "REPLACE" => {
            ReturnKind::RowCount
        }
        _ => ReturnKind::All,
    }
}

fn leading_keyword(sql: &str) -> &str {
    let mut rest = sql.trim_start();
    loop {
        if let Some(after) = rest.strip_prefix("--") {
            rest = after.split_once('\n').map_or("", |(_, tail)| tail).trim_start();
        } else if let Some(after) = rest.strip_prefix("/*") {
            rest = after.split_once("*/").map_or("", |(_, tail)| tail).trim_start();
        } else {
            break;
        }
    }
    let end = rest
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(rest.len());
    &rest[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbs() {
        assert_eq!(infer_return_kind("select * from users"), ReturnKind::All);
        assert_eq!(
            infer_return_kind("insert into users(name) values(?)"),
            ReturnKind::LastInsertId
        );
        assert_eq!(infer_return_kind("  UPDATE t SET a = 1"), ReturnKind::RowCount);
        assert_eq!(infer_return_kind("delete from t"), ReturnKind::RowCount);
        assert_eq!(infer_return_kind("Create table t (id int)"), ReturnKind::RowCount);
        assert_eq!(infer_return_kind("drop table t"), ReturnKind::RowCount);
        assert_eq!(infer_return_kind("REPLACE INTO t VALUES (1)"), ReturnKind::RowCount);
        assert_eq!(infer_return_kind("show tables"), ReturnKind::All);
        assert_eq!(infer_return_kind("describe t"), ReturnKind::All);
        assert_eq!(infer_return_kind("pragma table_info(t)"), ReturnKind::All);
        assert_eq!(infer_return_kind(""), ReturnKind::All);
    }

    #[test]
    fn skips_leading_comments() {
        assert_eq!(
            infer_return_kind("-- audit\n/* note */ insert into t default values"),
            ReturnKind::LastInsertId
        );
        assert_eq!(infer_return_kind("(select 1)"), ReturnKind::All);
    }
}
