// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, crate_version, value_parser};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .conflicts_with("jsonl")
            .help("Print JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print one JSON object per line"),
    )
}

fn loan_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("type")
            .long("type")
            .default_value("personal")
            .help("Loan type: personal|business|emergency"),
    )
    .arg(
        Arg::new("amount")
            .long("amount")
            .required(true)
            .help("Principal requested"),
    )
    .arg(
        Arg::new("period")
            .long("period")
            .required(true)
            .value_parser(value_parser!(i64))
            .allow_negative_numbers(true)
            .help("Repayment period in months"),
    )
}

pub fn build_cli() -> Command {
    Command::new("loanease")
        .version(crate_version!())
        .about("Loan applications, decisions and mobile-money repayments")
        .arg(
            Arg::new("user")
                .long("user")
                .global(true)
                .help("Applicant identity (email or user id); defaults to LOANEASE_USER"),
        )
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(json_flags(
            loan_args(Command::new("apply").about("Submit a loan application"))
                .arg(
                    Arg::new("purpose")
                        .long("purpose")
                        .required(true)
                        .help("What the loan is for"),
                )
                .arg(
                    Arg::new("collateral")
                        .long("collateral")
                        .required(true)
                        .help("Item of equal value to the loan amount"),
                ),
        ))
        .subcommand(json_flags(loan_args(
            Command::new("quote").about("Preview loan terms without applying"),
        )))
        .subcommand(json_flags(
            Command::new("dashboard").about("List your applications and balances"),
        ))
        .subcommand(
            Command::new("repay")
                .about("Simulated M-Pesa repayment against an approved loan")
                .arg(Arg::new("id").required(true).help("Application id or prefix"))
                .arg(
                    Arg::new("phone")
                        .long("phone")
                        .required(true)
                        .help("M-Pesa phone number, e.g. 0712345678"),
                )
                .arg(
                    Arg::new("amount")
                        .long("amount")
                        .help("Amount to pay; defaults to the next installment"),
                ),
        )
        .subcommand(
            Command::new("admin")
                .about("Review and decide applications")
                .subcommand(json_flags(
                    Command::new("list").about("All applications, newest first").arg(
                        Arg::new("status")
                            .long("status")
                            .help("Filter: pending|approved|rejected"),
                    ),
                ))
                .subcommand(
                    Command::new("decide")
                        .about("Approve or reject one application")
                        .arg(Arg::new("id").required(true).help("Application id or prefix"))
                        .arg(
                            Arg::new("outcome")
                                .required(true)
                                .help("approve|reject"),
                        ),
                )
                .subcommand(
                    Command::new("process")
                        .about("Decide every pending application with a policy")
                        .arg(
                            Arg::new("policy")
                                .long("policy")
                                .default_value("coin-flip")
                                .help("coin-flip|threshold"),
                        )
                        .arg(
                            Arg::new("seed")
                                .long("seed")
                                .value_parser(value_parser!(u64))
                                .help("Seed for the coin-flip policy"),
                        )
                        .arg(
                            Arg::new("max_amount")
                                .long("max-amount")
                                .help("Threshold policy: largest principal approved"),
                        )
                        .arg(
                            Arg::new("max_period")
                                .long("max-period")
                                .value_parser(value_parser!(u32))
                                .help("Threshold policy: longest period approved"),
                        ),
                ),
        )
        .subcommand(
            Command::new("notifications")
                .about("Your notification inbox")
                .arg(
                    Arg::new("unread")
                        .long("unread")
                        .action(ArgAction::SetTrue)
                        .help("Only unread messages"),
                )
                .arg(
                    Arg::new("mark_read")
                        .long("mark-read")
                        .action(ArgAction::SetTrue)
                        .help("Mark shown messages as read"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Print JSON"),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Export applications")
                .subcommand(
                    Command::new("applications")
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .default_value("csv")
                                .help("csv|json"),
                        )
                        .arg(Arg::new("out").long("out").required(true))
                        .arg(
                            Arg::new("all")
                                .long("all")
                                .action(ArgAction::SetTrue)
                                .help("Every applicant, not just --user"),
                        ),
                ),
        )
        .subcommand(Command::new("doctor").about("Check stored applications for inconsistencies"))
        .subcommand(
            Command::new("currency")
                .about("Show or set the display currency")
                .arg(Arg::new("code").help("Three-letter code, e.g. KES")),
        )
}
