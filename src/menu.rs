use std::io::{BufRead, Write};

use tracing::{debug, warn};

use crate::equation::{parse_equation, Equation, Side};
use crate::operator::{evaluate, Operator};
use crate::search::{probe, solve_within, SearchDomain};

const RULE: &str = "==================================================";
const THIN_RULE: &str = "----------------------------------------";

/// Where an interactive session currently is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuState
{
    /// Showing the main menu and waiting for a choice.
    Main,
    /// Waiting for the user to confirm that they want to leave.
    ConfirmExit,
    /// The user left, or input ran out.
    Finished,
}

/// The outcome of asking the user for a value.
enum Prompted<T>
{
    Value(T),
    /// The input was unusable and the user has already been told why.
    Rejected,
    /// Input ran out.
    Closed,
}

/// Formats a number for display, showing values within `1e-6` of an
/// integer as that integer.
///
/// # Example
/// ```
/// use searchcalc::menu::format_number;
///
/// assert_eq!(format_number(4.9999999), "5");
/// assert_eq!(format_number(-2.5), "-2.5");
/// ```
pub fn format_number(value: f64) -> String
{
    let rounded = value.round();
    if (value - rounded).abs() < 1e-6
    {
        // + 0.0 turns a -0 into 0
        format!("{}", rounded + 0.0)
    }
    else
    {
        format!("{value}")
    }
}

/// A menu-driven calculator reading commands from `input` and writing
/// everything it shows to `output`. Nothing is remembered between commands
/// apart from the menu state itself.
pub struct Session<R, W>
{
    input: R,
    output: W,
    domain: SearchDomain,
    state: MenuState,
}

impl <R: BufRead, W: Write> Session<R, W>
{
    pub fn new(input: R, output: W) -> Session<R, W>
    {
        Session
        {
            input,
            output,
            domain: SearchDomain::default(),
            state: MenuState::Main,
        }
    }

    /// Uses `domain` instead of the default one when solving equations.
    pub fn with_domain(mut self, domain: SearchDomain) -> Session<R, W>
    {
        self.domain = domain;
        self
    }

    pub fn state(&self) -> MenuState
    {
        self.state
    }

    /// Gives back the output stream, e.g. to inspect what was written.
    pub fn into_output(self) -> W
    {
        self.output
    }

    /// Runs the session until the user exits or input runs out.
    pub fn run(&mut self) -> anyhow::Result<()>
    {
        while self.state != MenuState::Finished
        {
            self.step()?;
        }
        Ok(())
    }

    /// Handles a single prompt of the current state and moves to the next one.
    pub fn step(&mut self) -> anyhow::Result<MenuState>
    {
        self.state = match self.state
        {
            MenuState::Main => self.main_menu()?,
            MenuState::ConfirmExit => self.confirm_exit()?,
            MenuState::Finished => MenuState::Finished,
        };
        Ok(self.state)
    }

    /// Writes `message` and reads one line of input, or `None` at the end of input.
    fn prompt(&mut self, message: &str) -> anyhow::Result<Option<String>>
    {
        write!(self.output, "{message}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0
        {
            debug!("input closed");
            return Ok(None);
        }
        Ok(Some(line.trim().to_owned()))
    }

    /// Prompts for a finite number, reporting anything else to the user.
    fn prompt_number(&mut self, message: &str) -> anyhow::Result<Prompted<f64>>
    {
        let Some(text) = self.prompt(message)? else { return Ok(Prompted::Closed) };
        match text.parse::<f64>()
        {
            Ok(num) if num.is_finite() => Ok(Prompted::Value(num)),
            _ => {
                warn!(text = %text, "expected a finite number");
                writeln!(self.output, "\n{text:?} is not a number.")?;
                Ok(Prompted::Rejected)
            },
        }
    }

    fn main_menu(&mut self) -> anyhow::Result<MenuState>
    {
        writeln!(self.output, "\n{RULE}")?;
        writeln!(self.output, "Smart Calculator with search")?;
        writeln!(self.output, "{RULE}")?;
        writeln!(self.output, "1. Basic Calculation")?;
        writeln!(self.output, "2. Solve equation (using search)")?;
        writeln!(self.output, "3. See search visualization")?;
        writeln!(self.output, "4. About search algorithms")?;
        writeln!(self.output, "5. Exit")?;

        let Some(choice) = self.prompt("\nChoose Option (1-5): ")? else { return Ok(MenuState::Finished) };
        debug!(choice = %choice, "menu choice");

        match choice.as_str()
        {
            "1" => self.basic_calculation(),
            "2" => self.solve_equation(),
            "3" => self.visualize_search(),
            "4" => {
                self.about()?;
                Ok(MenuState::Main)
            },
            "5" => Ok(MenuState::ConfirmExit),
            _ => {
                writeln!(self.output, "\nInvalid choice. Please enter a number between 1 and 5.")?;
                Ok(MenuState::Main)
            },
        }
    }

    fn basic_calculation(&mut self) -> anyhow::Result<MenuState>
    {
        let a = match self.prompt_number("Enter first number: ")?
        {
            Prompted::Value(a) => a,
            Prompted::Rejected => return Ok(MenuState::Main),
            Prompted::Closed => return Ok(MenuState::Finished),
        };
        let Some(op) = self.prompt("Enter operation (+, -, *, /, ^): ")? else { return Ok(MenuState::Finished) };
        let b = match self.prompt_number("Enter second number: ")?
        {
            Prompted::Value(b) => b,
            Prompted::Rejected => return Ok(MenuState::Main),
            Prompted::Closed => return Ok(MenuState::Finished),
        };

        match evaluate(&op, a, b)
        {
            Ok(res) => writeln!(self.output, "Result: {a} {op} {b} = {res}")?,
            Err(e) => writeln!(self.output, "Error: {e}")?,
        }
        Ok(MenuState::Main)
    }

    /// Asks for each part of an equation separately.
    fn prompt_equation_parts(&mut self) -> anyhow::Result<Prompted<Equation>>
    {
        let target = match self.prompt_number("Enter the number after the equals sign (=): ")?
        {
            Prompted::Value(t) => t,
            Prompted::Rejected => return Ok(Prompted::Rejected),
            Prompted::Closed => return Ok(Prompted::Closed),
        };
        let Some(op) = self.prompt("Enter the operation (+, -, *, /, ^): ")? else { return Ok(Prompted::Closed) };
        let known = match self.prompt_number("Enter the other number in the equation (the one next to x): ")?
        {
            Prompted::Value(k) => k,
            Prompted::Rejected => return Ok(Prompted::Rejected),
            Prompted::Closed => return Ok(Prompted::Closed),
        };
        let Some(side) = self.prompt("Is x on the left or right of the operator? (left/right): ")? else { return Ok(Prompted::Closed) };

        let parts = op.parse::<Operator>()
            .map_err(anyhow::Error::from)
            .and_then(|operator| Ok((operator, side.parse::<Side>()?)));
        match parts
        {
            Ok((operator, side)) => Ok(Prompted::Value(Equation::new(target, operator, known, side))),
            Err(e) => {
                writeln!(self.output, "\nCould not read the equation: {e}")?;
                Ok(Prompted::Rejected)
            },
        }
    }

    /// Asks for a whole equation, or for its parts when the line is left blank.
    fn prompt_equation(&mut self) -> anyhow::Result<Prompted<(String, Equation)>>
    {
        let Some(text) = self.prompt("\nEnter the equation, or leave blank to enter it piece by piece: ")?
        else { return Ok(Prompted::Closed) };

        if text.is_empty()
        {
            let parsed = match self.prompt_equation_parts()?
            {
                Prompted::Value(eqn) => Prompted::Value(("x".to_owned(), eqn)),
                Prompted::Rejected => Prompted::Rejected,
                Prompted::Closed => Prompted::Closed,
            };
            return Ok(parsed);
        }

        match parse_equation(&text)
        {
            Ok(parsed) => Ok(Prompted::Value(parsed)),
            Err(e) => {
                writeln!(self.output, "\nCould not read the equation: {e}")?;
                Ok(Prompted::Rejected)
            },
        }
    }

    fn solve_equation(&mut self) -> anyhow::Result<MenuState>
    {
        writeln!(self.output, "\n{RULE}")?;
        writeln!(self.output, "Equation solver (using search)")?;
        writeln!(self.output, "{RULE}")?;
        writeln!(self.output, "I can solve equations like:")?;
        for example in ["x + 5 = 10", "x * 3 = 15", "10 - x = 7", "20 / x = 4"]
        {
            writeln!(self.output, "{example}")?;
        }

        let (var, eqn) = match self.prompt_equation()?
        {
            Prompted::Value(parsed) => parsed,
            Prompted::Rejected => return Ok(MenuState::Main),
            Prompted::Closed => return Ok(MenuState::Finished),
        };

        match solve_within(&eqn, &self.domain)
        {
            Some(x) => writeln!(self.output, "\nSolution found: {var} = {}", format_number(x))?,
            None => writeln!(
                self.output,
                "\nNo solution found: {} has no finite value anywhere between {} and {}.",
                eqn.display_with(&var),
                self.domain.min(),
                self.domain.max()
            )?,
        }
        Ok(MenuState::Main)
    }

    fn visualize_search(&mut self) -> anyhow::Result<MenuState>
    {
        let eqn = Equation::new(12.0, Operator::Plus, 5.0, Side::Left);

        writeln!(self.output, "\nLet's solve: {eqn}")?;
        writeln!(self.output, "\nVisualizing search process:")?;
        writeln!(self.output, "Goal: Find x where {eqn}")?;
        writeln!(self.output, "\nTesting values:")?;
        writeln!(self.output, "{THIN_RULE}")?;

        for p in probe(&eqn)
        {
            match (p.result, p.distance)
            {
                (Some(res), _) if p.is_exact() => {
                    writeln!(self.output, "x = {:6.1} => Result = {res:6.2} (Exact match!)", p.x)?
                },
                (Some(res), Some(dist)) => {
                    writeln!(self.output, "x = {:6.1} => Result = {res:6.1} [off by {dist:.1}]", p.x)?
                },
                _ => writeln!(self.output, "x = {:6.1} => undefined", p.x)?,
            }
        }

        writeln!(self.output, "\n...continuing detailed search...")?;
        match solve_within(&eqn, &self.domain)
        {
            Some(x) => writeln!(self.output, "\nSolution: x = {}", format_number(x))?,
            None => writeln!(self.output, "\nNo solution found.")?,
        }
        Ok(MenuState::Main)
    }

    fn about(&mut self) -> anyhow::Result<()>
    {
        writeln!(self.output, "\nAbout Search Algorithms")?;
        writeln!(self.output, "{THIN_RULE}")?;
        writeln!(self.output, "This calculator uses a simple linear search:")?;
        writeln!(self.output, "It tries different values of x")?;
        writeln!(self.output, "Checks if each value solves the equation")?;
        writeln!(self.output, "Keeps track of the best answer")?;
        writeln!(self.output, "This is similar to 'brute-force' search")?;
        writeln!(self.output, "\nSmarter search algorithms exist:")?;
        writeln!(self.output, "BFS: Explores all possibilities level by level")?;
        writeln!(self.output, "DFS: Explores one path deeply before trying others")?;
        writeln!(self.output, "A*: Uses heuristics to search more efficiently")?;
        Ok(())
    }

    fn confirm_exit(&mut self) -> anyhow::Result<MenuState>
    {
        let Some(answer) = self.prompt("\nAre you sure you want to exit? (y/n): ")? else { return Ok(MenuState::Finished) };

        if answer.eq_ignore_ascii_case("y")
        {
            writeln!(self.output, "\nThanks for using Smart Calculator!")?;
            Ok(MenuState::Finished)
        }
        else
        {
            writeln!(self.output, "\nReturning to menu...")?;
            Ok(MenuState::Main)
        }
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    fn run_session(input: &str) -> String
    {
        let mut session = Session::new(input.as_bytes(), Vec::new());
        session.run().unwrap();
        assert_eq!(session.state(), MenuState::Finished);
        String::from_utf8(session.into_output()).unwrap()
    }

    #[test]
    fn formats_near_integers_as_integers()
    {
        assert_eq!(format_number(5.0), "5");
        assert_eq!(format_number(7.0000004), "7");
        assert_eq!(format_number(-0.0000001), "0");
        assert_eq!(format_number(0.1), "0.1");
    }

    #[test]
    fn basic_calculation()
    {
        let out = run_session("1\n6\n*\n7\n5\ny\n");
        assert!(out.contains("Result: 6 * 7 = 42"));
        assert!(out.contains("Thanks for using Smart Calculator!"));
    }

    #[test]
    fn basic_calculation_reports_bad_operator()
    {
        let out = run_session("1\n6\n%\n7\n");
        assert!(out.contains("Error: found unsupported operator \"%\""));
    }

    #[test]
    fn solves_typed_equation()
    {
        let out = run_session("2\n20 / y = 4\n");
        assert!(out.contains("Solution found: y = 5"));
    }

    #[test]
    fn solves_equation_entered_piece_by_piece()
    {
        let out = run_session("2\n\n7\n-\n10\nright\n");
        assert!(out.contains("Solution found: x = 3"));
    }

    #[test]
    fn reports_unsolvable_equation()
    {
        let out = run_session("2\nx / 0 = 1\n");
        assert!(out.contains("No solution found: x / 0 = 1 has no finite value anywhere between -100 and 100."));
    }

    #[test]
    fn bad_input_returns_to_menu()
    {
        let out = run_session("9\n1\nsix\n2\nx + = 1\n");
        assert!(out.contains("Invalid choice. Please enter a number between 1 and 5."));
        assert!(out.contains("\"six\" is not a number."));
        assert!(out.contains("Could not read the equation"));
        assert_eq!(out.matches("Choose Option (1-5)").count(), 4);
    }

    #[test]
    fn rejects_non_finite_numbers()
    {
        let out = run_session("2\n\nnan\n1\n-inf\n");
        assert!(out.contains("\"nan\" is not a number."));
        assert!(out.contains("\"-inf\" is not a number."));
        assert!(!out.contains("No solution found"));
    }

    #[test]
    fn bad_piece_is_reported_once()
    {
        let out = run_session("2\n\nsix\n");
        assert!(out.contains("\"six\" is not a number."));
        assert!(!out.contains("Could not read the equation"));
        assert_eq!(out.matches("Choose Option (1-5)").count(), 2);

        let out = run_session("2\n\n7\n%\n10\nright\n");
        assert_eq!(out.matches("Could not read the equation: found unsupported operator \"%\"").count(), 1);
    }

    #[test]
    fn visualizes_search()
    {
        let out = run_session("3\n");
        assert!(out.contains("Goal: Find x where x + 5 = 12"));
        assert!(out.contains("x =  -10.0 => Result =   -5.0 [off by 17.0]"));
        assert!(out.contains("Solution: x = 7"));
    }

    #[test]
    fn declining_exit_returns_to_menu()
    {
        let mut session = Session::new("5\nn\n".as_bytes(), Vec::new());

        assert_eq!(session.step().unwrap(), MenuState::ConfirmExit);
        assert_eq!(session.step().unwrap(), MenuState::Main);
        assert_eq!(session.step().unwrap(), MenuState::Finished);

        let out = String::from_utf8(session.into_output()).unwrap();
        assert!(out.contains("Returning to menu..."));
    }

    #[test]
    fn uses_the_given_domain()
    {
        let domain = SearchDomain::new(0.0, 10.0, 1.0, 1e-6).unwrap();
        let mut session = Session::new("2\nx + 1000 = 1\n".as_bytes(), Vec::new()).with_domain(domain);
        session.run().unwrap();

        let out = String::from_utf8(session.into_output()).unwrap();
        assert!(out.contains("Solution found: x = 0"));
    }
}
