extern crate nom;

use nom::{
    bytes::complete::tag,
    character::complete::{char, digit1},
    combinator::{map_res, opt},
    sequence::preceded,
    IResult,
};

use super::types::BranchVersion;

pub fn parse_release_prefix(input: &str) -> IResult<&str, &str> {
    tag("++Fortnite+Release-")(input)
}

pub fn parse_u16(input: &str) -> IResult<&str, u16> {
    map_res(digit1, |digits: &str| digits.parse::<u16>())(input)
}

pub fn parse_u32(input: &str) -> IResult<&str, u32> {
    map_res(digit1, |digits: &str| digits.parse::<u32>())(input)
}

pub fn parse_changelist(input: &str) -> IResult<&str, Option<u32>> {
    opt(preceded(tag("-CL-"), parse_u32))(input)
}

pub fn parse_branch(input: &str) -> IResult<&str, BranchVersion> {
    let (input, _) = parse_release_prefix(input)?;
    let (input, major) = parse_u16(input)?;
    let (input, _) = char('.')(input)?;
    let (input, minor) = parse_u16(input)?;
    let (input, changelist) = parse_changelist(input)?;

    Ok((
        input,
        BranchVersion {
            major,
            minor,
            changelist,
        },
    ))
}
