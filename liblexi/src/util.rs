/*
 * Created on Tue Jan 14 2025
 *
 * This file is a part of LexiDB
 * LexiDB is a free and open-source in-memory key/value database that
 * aims to deliver predictable performance through a compact typed object
 * model and a vectorized keyspace engine
 *
 * Copyright (c) 2025, the LexiDB authors
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License
 * along with this program. If not, see <https://www.gnu.org/licenses/>.
 *
*/

pub mod terminal {
    //! Colored status lines for the window where the logger is not an
    //! option: fatal diagnostics before it is initialized, and the goodbye
    //! after it has gone down with the server

    use std::fmt::Display;
    use std::io::{self, Write};
    use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

    fn paint(stream: &mut StandardStream, color: Color, item: &dyn Display) -> io::Result<()> {
        stream.set_color(ColorSpec::new().set_fg(Some(color)))?;
        write!(stream, "{}", item)?;
        stream.reset()
    }

    /// A cyan status line on stdout (the shutdown goodbye)
    pub fn write_info(item: impl Display) -> io::Result<()> {
        paint(
            &mut StandardStream::stdout(ColorChoice::Auto),
            Color::Cyan,
            &item,
        )
    }

    /// A red diagnostic on stderr (startup failures)
    pub fn write_error(item: impl Display) -> io::Result<()> {
        paint(
            &mut StandardStream::stderr(ColorChoice::Auto),
            Color::Red,
            &item,
        )
    }
}
