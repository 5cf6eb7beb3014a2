use std::fmt::Write;
use std::fs::File;
use std::io::{self, BufRead};

use crate::control::string::*;
use crate::hand::*;
use crate::model::*;
use crate::util::misc::*;

use crate::error;

#[derive(Debug)]
pub struct CalculatorApp {
    args: Vec<String>,
    detail: bool,
}

impl CalculatorApp {
    pub fn new(args: Vec<String>) -> Self {
        Self {
            args,
            detail: false,
        }
    }

    pub fn run(&mut self) {
        let mut file_path = "".to_string();
        let mut exps = vec![];
        let mut it = self.args.iter();
        while let Some(s) = it.next() {
            match s.as_str() {
                "-d" => self.detail = true,
                "-f" => file_path = next_value(&mut it, s),
                _ => {
                    if s.starts_with('-') {
                        error!("unknown option: {}", s);
                        return;
                    }
                    exps.push(s.clone());
                }
            }
        }

        // 式はシェル上で空白区切りの複数引数として渡される
        let exp = exps.join(" ");
        if exp.is_empty() == file_path.is_empty() {
            print_usage();
            return;
        }

        let res = if !exp.is_empty() {
            self.process_expression(&exp)
        } else {
            self.run_from_file(&file_path)
        };
        if let Err(e) = res {
            error!("{}", e);
        }
    }

    fn run_from_file(&self, file_path: &str) -> Res {
        let file = File::open(file_path)?;
        let lines = io::BufReader::new(file).lines();
        for exp in lines.map_while(Result::ok) {
            let e = exp.trim();
            if e.is_empty() || e.starts_with('#') {
                // 空行とコメント行はスキップ
                println!("> {}", exp);
            } else if let Err(e) = self.process_expression(&exp) {
                error!("{}", e);
            }
            println!();
        }
        Ok(())
    }

    fn process_expression(&self, exp: &str) -> Res {
        let mut calculator = Calculator::new(self.detail);
        calculator.parse(exp)?;
        calculator.run();
        Ok(())
    }
}

#[derive(Debug, PartialEq)]
enum Verify {
    Ok,
    Error,
    Skip,
}

#[derive(Debug)]
struct Calculator {
    detail: bool,
    // evaluate_hand params
    hand: Vec<Tile>,
    melds: Vec<Meld>,
    dora_indicators: Vec<Tile>,
    winning_tile: Option<Tile>,
    is_tsumo: bool,
    is_riichi: bool,
    house: House,
    round: House,
    // fan verify
    fan: Option<usize>,
}

impl Calculator {
    fn new(detail: bool) -> Self {
        Self {
            detail,
            hand: vec![],
            melds: vec![],
            dora_indicators: vec![],
            winning_tile: None,
            is_tsumo: false,
            is_riichi: false,
            house: House::E,
            round: House::E,
            fan: None,
        }
    }

    // 例: "m123p456s789z11 pon:z7 win:m3 tsumo riichi dora:m2 house:s round:e =FAN"
    // 和了牌を省略した場合は手牌の最後の牌
    fn parse(&mut self, input: &str) -> Res {
        println!("> {}", input);

        let input = input.split('#').next().unwrap_or(""); // コメント削除
        let mut exp_melds = vec![];
        for token in input.split_whitespace() {
            if let Some(fan) = token.strip_prefix('=') {
                self.fan = Some(fan.parse::<usize>()?);
                continue;
            }
            match token.split_once(':') {
                Some(("win", t)) => self.winning_tile = Some(Tile::from_symbol(t)?),
                Some(("dora", ts)) => self.dora_indicators.extend(tiles_from_string(ts)?),
                Some(("house", h)) => self.house = house_from_str(h)?,
                Some(("round", h)) => self.round = house_from_str(h)?,
                Some(_) => exp_melds.push(token), // 副露のパースに座席情報が必要なので後で実行
                None => match token {
                    "tsumo" => self.is_tsumo = true,
                    "riichi" => self.is_riichi = true,
                    _ => self.hand.extend(tiles_from_string(token)?),
                },
            }
        }

        for exp in exp_melds {
            self.melds.push(meld_from_string(exp, self.house)?);
        }

        if self.hand.is_empty() {
            Err("hand is empty")?;
        }
        match self.winning_tile {
            Some(t) => {
                if !self.hand.contains(&t) {
                    Err(format!("winning tile {} is not in hand", t))?;
                }
            }
            None => self.winning_tile = self.hand.last().copied(),
        }
        if self.is_riichi && self.melds.iter().any(|m| m.is_open()) {
            Err("riichi with open melds")?;
        }

        if self.detail {
            println!("{:?}", self);
        }

        Ok(())
    }

    fn run(&self) -> Verify {
        let winning_tile = match self.winning_tile {
            Some(t) => t,
            None => return Verify::Error,
        };
        let tt = tiles_to_tile_table(&self.hand);
        let ctx = evaluate_hand(
            &tt,
            &self.melds,
            &self.dora_indicators,
            winning_tile,
            self.is_tsumo,
            self.is_riichi,
            self.round.wind(),
            self.house.wind(),
        );

        let fan = match ctx {
            Some(ctx) => {
                if self.detail {
                    println!("{:?}", ctx);
                }

                let mut yakus = "".to_string();
                for y in &ctx.yaku {
                    let _ = write!(yakus, "{}({}), ", y.name, y.fan);
                }
                println!("yakus: {}", yakus);

                match fan_to_point(ctx.fan, self.house.is_dealer()) {
                    Some(point) => {
                        let deltas = if self.is_tsumo {
                            tsumo_point_deltas(self.house, point)
                        } else {
                            // 放銃者は点数に影響しないので上家とする
                            ron_point_deltas(self.house, self.house.prev(), point)
                        };
                        println!(
                            "dora: {}, fan: {}, point: {}, {}",
                            ctx.n_dora,
                            ctx.fan,
                            point,
                            get_point_title(ctx.fan)
                        );
                        let ds: Vec<String> =
                            deltas.iter().map(|(h, d)| format!("{}:{:+}", h, d)).collect();
                        println!("deltas: {}", ds.join(" "));
                    }
                    None => println!("no yaku"),
                }
                ctx.fan
            }
            None => {
                println!("not win hand");
                0
            }
        };

        let verify = match self.fan {
            Some(f) if f == fan => Verify::Ok,
            Some(_) => Verify::Error,
            None => Verify::Skip,
        };
        println!("verify: {:?}", verify);
        verify
    }
}

fn house_from_str(s: &str) -> Res<House> {
    let mut chars = s.chars();
    match (chars.next().and_then(House::from_char), chars.next()) {
        (Some(h), None) => Ok(h),
        _ => Err(format!("invalid house: '{}'", s).into()),
    }
}

fn print_usage() {
    error!(
        r"invalid input
Usage
    $ cargo run C EXPRESSION [-d]
    $ cargo run C -f FILE [-d]
Expression
    HAND [MELD...] [win:TILE] [tsumo] [riichi] [dora:TILES] [house:H] [round:H] [=FAN]
    MELD: pon:z7 chi:m345 minkan:p1 ankan:s9 kakan:z5
Options
    -d: print debug info
    -f: read expresisons from file instead of a commandline expression
"
    );
}

#[test]
fn test_calculator_parse() {
    let mut c = Calculator::new(false);
    c.parse("m123p456s789z11 pon:z7 win:m3 tsumo dora:m2 house:s round:e =5 # comment")
        .unwrap();
    assert_eq!(c.hand.len(), 11);
    assert_eq!(c.melds.len(), 1);
    assert_eq!(c.melds[0].from, House::E);
    assert_eq!(c.winning_tile, Some(Tile(TM, 3)));
    assert_eq!(c.dora_indicators, vec![Tile(TM, 2)]);
    assert_eq!(c.house, House::S);
    assert_eq!(c.fan, Some(5));
    assert!(c.is_tsumo);

    // 和了牌の省略
    let mut c = Calculator::new(false);
    c.parse("m123p456s789z1122").unwrap();
    assert_eq!(c.winning_tile, Some(Tile(TZ, 2)));

    assert!(Calculator::new(false).parse("m123 win:p1").is_err());
    assert!(Calculator::new(false).parse("m123 house:x").is_err());
    assert!(Calculator::new(false).parse("m123 riichi pon:z7").is_err());
}

#[test]
fn test_calculator() {
    let file = File::open("tests/win_hands.txt").unwrap();
    let lines = io::BufReader::new(file).lines();
    for exp in lines.map_while(Result::ok) {
        let e = exp.trim();
        if e.is_empty() || e.starts_with('#') {
            // 空行とコメント行はスキップ
            println!("> {}", exp);
        } else {
            let mut calculator = Calculator::new(false);
            calculator.parse(e).unwrap();
            assert_eq!(Verify::Ok, calculator.run(), "{}", e);
        }
    }
}
