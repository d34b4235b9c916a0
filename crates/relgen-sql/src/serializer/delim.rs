use super::{Formatter, ToSql};

/// Comma delimited
pub(super) struct Comma<L>(pub(super) L);

/// Period delimited
pub(super) struct Period<L>(pub(super) L);

/// `AND` delimited
pub(super) struct And<L>(pub(super) L);

fn delimited<L>(f: &mut Formatter<'_>, list: L, delim: &'static str)
where
    L: IntoIterator,
    L::Item: ToSql,
{
    let mut s = "";
    for i in list {
        fmt!(f, s i);
        s = delim;
    }
}

impl<L> ToSql for Comma<L>
where
    L: IntoIterator,
    L::Item: ToSql,
{
    fn to_sql(self, f: &mut Formatter<'_>) {
        delimited(f, self.0, ", ");
    }
}

impl<L> ToSql for Period<L>
where
    L: IntoIterator,
    L::Item: ToSql,
{
    fn to_sql(self, f: &mut Formatter<'_>) {
        delimited(f, self.0, ".");
    }
}

impl<L> ToSql for And<L>
where
    L: IntoIterator,
    L::Item: ToSql,
{
    fn to_sql(self, f: &mut Formatter<'_>) {
        delimited(f, self.0, " AND ");
    }
}
